use ethers::contract::abigen;

abigen!(
    MaliciousAccount,
    "artifact/MaliciousAccount.json",
    derives(serde::Serialize, serde::Deserialize)
);
