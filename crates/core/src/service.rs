use std::io::Write;

use tracing::info;

use crate::config::IndexingConfiguration;

/// Entry point of an indexing runtime that consumes the configuration
///
/// The configuration is handed over by reference once, before the runtime
/// starts any work of its own.
pub trait IndexingRuntime {
    /// Start the runtime with a fully assembled configuration
    fn start(&mut self, config: &IndexingConfiguration) -> anyhow::Result<()>;
}

/// Runtime that writes the configuration as JSON for an out-of-process indexer
pub struct JsonExport<W: Write> {
    writer: W,
}

impl<W: Write> JsonExport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> IndexingRuntime for JsonExport<W> {
    fn start(&mut self, config: &IndexingConfiguration) -> anyhow::Result<()> {
        let json = config.to_json_pretty()?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;

        info!(
            networks = config.networks().len(),
            contracts = config.contracts().len(),
            "Exported indexing configuration"
        );
        Ok(())
    }
}

/// Hand a configuration to a runtime
pub fn launch<R: IndexingRuntime + ?Sized>(runtime: &mut R, config: &IndexingConfiguration) -> anyhow::Result<()> {
    runtime.start(config)
}
