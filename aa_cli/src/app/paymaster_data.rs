use aa_contracts::PaymasterAndData;
use color_eyre::eyre::Result;

use crate::args;

pub struct PaymasterData {
    opts: args::PaymasterData,
}

impl PaymasterData {
    pub fn new(opts: args::PaymasterData) -> Self {
        Self { opts }
    }

    pub fn run(self) -> Result<()> {
        println!("{}", self.render()?);
        Ok(())
    }

    /// Encode prints hex, decode prints the fields as JSON.
    fn render(&self) -> Result<String> {
        match &self.opts {
            args::PaymasterData::Encode(encode) => {
                let data = PaymasterAndData {
                    paymaster: encode.paymaster,
                    valid_until: encode.valid_until,
                    valid_after: encode.valid_after,
                    signature: encode.signature.clone().unwrap_or_default(),
                };
                warn_on_signature(&data);
                Ok(data.encode().to_string())
            }
            args::PaymasterData::Decode(decode) => {
                let data = PaymasterAndData::decode(&decode.data)?;
                warn_on_signature(&data);
                Ok(serde_json::to_string_pretty(&data)?)
            }
        }
    }
}

fn warn_on_signature(data: &PaymasterAndData) {
    if !data.has_valid_signature_length() {
        warn!(
            length = data.signature.len(),
            "the paymaster only accepts 64 or 65 byte signatures"
        );
    }
}
