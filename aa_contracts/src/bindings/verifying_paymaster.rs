use ethers::contract::abigen;

abigen!(
    VerifyingPaymaster,
    "artifact/VerifyingPaymaster.json",
    derives(serde::Serialize, serde::Deserialize)
);
