//! Application functions

/// Print ABIs
mod abi;
/// Build and send creation transactions
mod deploy;
/// `paymasterAndData` encoding
mod paymaster_data;
/// Selector and topic checks
mod selectors;

use color_eyre::eyre::Result;

use crate::args::{self, AppOpts};

#[derive(Debug)]
pub struct App {
    opts: AppOpts,
}

impl App {
    pub fn new(opts: AppOpts) -> Self {
        Self { opts }
    }

    pub async fn run(self) -> Result<()> {
        use args::Commands::*;
        let AppOpts { cmd, node, .. } = self.opts;
        debug!(rpc_url = %node.rpc_url, "starting");

        match cmd {
            Abi(a) => abi::Abi::new(a).run(),
            Selectors(s) => selectors::Selectors::new(s).run(),
            DeployTx(d) => deploy::DeployTx::new(d, node).run(),
            Deploy(d) => deploy::Deploy::new(d, node).run().await,
            PaymasterData(p) => paymaster_data::PaymasterData::new(p).run(),
        }
    }
}
