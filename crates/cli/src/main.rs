mod args;
mod report;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use proflog_core::{LoadOptions, ProflogConfig, Session, write_synthetic};

use crate::args::{Args, Command};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ProflogConfig::from_json_file(path)?,
        None => ProflogConfig::default(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Summary {
            file,
            json,
            no_stats,
        } => {
            let mut options = config.load;
            if no_stats {
                options.gather_statistics = false;
            }
            let session = open(&file, options)?;
            report::write_summary(&mut out, &session, json)?;
        }
        Command::Tree {
            file,
            thread,
            max_depth,
        } => {
            let session = open(&file, config.load)?;
            report::write_tree(&mut out, &session, thread, max_depth)?;
        }
        Command::Stats { file, thread } => {
            let options = LoadOptions {
                gather_statistics: true,
            };
            let session = open(&file, options)?;
            report::write_stats(&mut out, &session, thread)?;
        }
        Command::Generate {
            out: path,
            threads,
            frames,
            depth,
            children,
        } => {
            let mut params = config.synthetic;
            params.threads = threads.unwrap_or(params.threads);
            params.frames_per_thread = frames.unwrap_or(params.frames_per_thread);
            params.depth = depth.unwrap_or(params.depth);
            params.children_per_block = children.unwrap_or(params.children_per_block);

            if params.expected_blocks().is_none() {
                bail!("requested trace is too large");
            }
            let file = File::create(&path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let count = write_synthetic(BufWriter::new(file), &params)?;
            info!("generated {params:?}");
            writeln!(out, "wrote {count} blocks to {}", path.display())?;
        }
    }

    out.flush()?;
    Ok(())
}

fn open(path: &Path, options: LoadOptions) -> Result<Session> {
    let mut session = Session::new(options);
    if session.load(path) == 0 {
        bail!("no blocks could be loaded from {}", path.display());
    }
    Ok(session)
}
