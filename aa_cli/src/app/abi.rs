use aa_contracts::Artifact;
use color_eyre::eyre::Result;

use crate::args;

pub struct Abi {
    opts: args::ContractOpts,
}

impl Abi {
    pub fn new(opts: args::ContractOpts) -> Self {
        Self { opts }
    }

    pub fn run(self) -> Result<()> {
        let artifact = Artifact::load(self.opts.contract)?;
        println!("{}", serde_json::to_string_pretty(&artifact.abi)?);
        Ok(())
    }
}
