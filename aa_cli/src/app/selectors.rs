use aa_contracts::{selectors, Artifact};
use color_eyre::eyre::Result;

use crate::args;

pub struct Selectors {
    opts: args::ContractOpts,
}

impl Selectors {
    pub fn new(opts: args::ContractOpts) -> Self {
        Self { opts }
    }

    /// Prints the report either way, fails when anything is missing.
    pub fn run(self) -> Result<()> {
        let artifact = Artifact::load(self.opts.contract)?;
        let report = selectors::check(&artifact);
        print!("{report}");
        selectors::verify(&artifact)?;
        info!(
            contract = %report.contract,
            functions = report.functions.len(),
            events = report.events.len(),
            "bytecode matches abi"
        );
        Ok(())
    }
}
