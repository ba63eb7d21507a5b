//! Logger for the CLI
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::eyre;
use owo_colors::OwoColorize;
use tracing::{Dispatch, Event, Subscriber};
use tracing_subscriber::{
    fmt::{format, format::Writer, FmtContext, FormatEvent, FormatFields, MakeWriter},
    prelude::*,
    registry::LookupSpan,
    EnvFilter, Layer,
};

use crate::args::LogOptions;

/// Logs go to stderr; stdout carries command output only.
pub struct Logger {
    json: bool,
    show_fields: bool,
    verbosity: Verbosity<InfoLevel>,
}

impl<'a> From<&'a LogOptions> for Logger {
    fn from(options: &'a LogOptions) -> Self {
        Self {
            json: options.json,
            show_fields: options.show_fields,
            verbosity: options.verbose.clone(),
        }
    }
}

impl Logger {
    /// Level filter for both crates when `RUST_LOG` is unset.
    fn directives(&self) -> String {
        let level = self.verbosity.log_level_filter() as usize;
        format!("aacli={level},aa_contracts={level}")
    }

    pub fn init(&self) -> eyre::Result<()> {
        let Logger {
            json, show_fields, ..
        } = *self;

        let filter = || {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::builder().parse_lossy(self.directives()))
        };

        let subscriber = tracing_subscriber::registry()
            .with((!json).then(|| human_layer(filter(), show_fields, std::io::stderr)))
            .with(json.then(|| {
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .with_filter(filter())
            }));

        let _ = tracing::dispatcher::set_global_default(Dispatch::new(subscriber));
        Ok(())
    }
}

fn human_layer<S, W>(filter: EnvFilter, show_fields: bool, writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .map_event_format(|_| PrettyTarget)
        .fmt_fields({
            let fun = format::debug_fn(move |writer, field, value| {
                if field.name() == "message" {
                    write!(writer, "{:?}", value.white())
                } else {
                    if show_fields {
                        write!(writer, "{} {:?}", field.bold(), value.white())?;
                    }
                    Ok(())
                }
            });
            if show_fields {
                fun.delimited("\n\t")
            } else {
                fun.delimited("")
            }
        });

    layer.with_writer(writer).with_filter(filter)
}

pub struct PrettyTarget;
impl<S, N> FormatEvent<S, N> for PrettyTarget
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let target = event.metadata().target();
        if writer.has_ansi_escapes() {
            match event.metadata().level().as_str() {
                "ERROR" => write!(&mut writer, "{} ", target.red().bold())?,
                "WARN" => write!(&mut writer, "{} ", target.yellow().bold())?,
                "INFO" => write!(&mut writer, "{} ", target.green().bold())?,
                "DEBUG" => write!(&mut writer, "{} ", target.blue().bold())?,
                "TRACE" => write!(&mut writer, "{} ", target.purple().bold())?,
                _ => (),
            }
        } else {
            write!(&mut writer, "{target} ")?;
        }

        ctx.format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}
