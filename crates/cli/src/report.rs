use std::io::Write;

use anyhow::{Result, bail};
use proflog_core::{Block, Selection, Session, ThreadId, ThreadTree};
use serde::Serialize;

/// Human-readable duration.
pub fn format_ns(ns: u64) -> String {
    let value = ns as f64;
    if value >= 1_000_000_000.0 {
        format!("{:.2}s", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{:.1}ms", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}µs", value / 1_000.0)
    } else {
        format!("{ns}ns")
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    path: Option<String>,
    ticks_per_second: u64,
    total_blocks: usize,
    arena_bytes: usize,
    threads: Vec<ThreadSummary>,
    selection: Selection,
}

#[derive(Debug, Serialize)]
struct ThreadSummary {
    thread_id: ThreadId,
    blocks: usize,
    roots: usize,
    depth: u32,
    begin_ns: Option<u64>,
    end_ns: Option<u64>,
    distinct_names: usize,
}

fn summarize(session: &Session) -> Summary {
    let header = session.header();
    Summary {
        path: session.last_path().map(|p| p.display().to_string()),
        ticks_per_second: header.ticks_per_second,
        total_blocks: session.block_count(),
        arena_bytes: session.data().len(),
        threads: session
            .tree()
            .iter()
            .map(|t| ThreadSummary {
                thread_id: t.thread_id,
                blocks: t.block_count,
                roots: t.roots.len(),
                depth: t.depth,
                begin_ns: t.begin().map(|b| header.ticks_to_ns(b)),
                end_ns: t.end().map(|e| header.ticks_to_ns(e)),
                distinct_names: t.statistics.len(),
            })
            .collect(),
        selection: session.selection(),
    }
}

pub fn write_summary(out: &mut impl Write, session: &Session, json: bool) -> Result<()> {
    let summary = summarize(session);
    if json {
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
        return Ok(());
    }

    if let Some(path) = &summary.path {
        writeln!(out, "{path}")?;
    }
    writeln!(
        out,
        "{} blocks in {} threads ({} bytes of block data)",
        summary.total_blocks,
        summary.threads.len(),
        summary.arena_bytes
    )?;
    for t in &summary.threads {
        let span = match (t.begin_ns, t.end_ns) {
            (Some(b), Some(e)) => format_ns(e.saturating_sub(b)),
            _ => "-".to_string(),
        };
        writeln!(
            out,
            "  thread {:>8}: {:>8} blocks, {:>6} roots, depth {:>3}, {span}",
            t.thread_id, t.blocks, t.roots, t.depth
        )?;
    }
    Ok(())
}

fn selected_threads<'a>(
    session: &'a Session,
    thread: Option<ThreadId>,
) -> Result<Vec<&'a ThreadTree>> {
    match thread {
        Some(id) => match session.tree().get(id) {
            Some(t) => Ok(vec![t]),
            None => bail!("thread {id} is not in the trace"),
        },
        None => Ok(session.tree().iter().collect()),
    }
}

fn write_block(out: &mut impl Write, session: &Session, block: &Block) -> Result<()> {
    let indent = "  ".repeat(block.depth as usize + 1);
    let name = session.block_name(block);
    if block.is_event() {
        writeln!(out, "{indent}#{} {name} (event)", block.index)?;
    } else {
        let ns = session.header().ticks_to_ns(block.duration());
        writeln!(out, "{indent}#{} {name} {}", block.index, format_ns(ns))?;
    }
    Ok(())
}

pub fn write_tree(
    out: &mut impl Write,
    session: &Session,
    thread: Option<ThreadId>,
    max_depth: Option<u32>,
) -> Result<()> {
    for t in selected_threads(session, thread)? {
        writeln!(out, "thread {} ({} blocks)", t.thread_id, t.block_count)?;
        let mut stack: Vec<&Block> = t.roots.iter().rev().collect();
        while let Some(block) = stack.pop() {
            write_block(out, session, block)?;
            if max_depth.is_none_or(|max| block.depth < max) {
                stack.extend(block.children.iter().rev());
            }
        }
    }
    Ok(())
}

pub fn write_stats(out: &mut impl Write, session: &Session, thread: Option<ThreadId>) -> Result<()> {
    let header = session.header();
    for t in selected_threads(session, thread)? {
        writeln!(out, "thread {}", t.thread_id)?;
        if t.statistics.is_empty() {
            writeln!(out, "  (no statistics gathered)")?;
            continue;
        }

        let mut rows: Vec<_> = t.statistics.iter().collect();
        rows.sort_by(|a, b| b.total_duration.cmp(&a.total_duration));
        writeln!(
            out,
            "  {:<32} {:>8} {:>10} {:>10} {:>10} {:>10}",
            "name", "calls", "total", "avg", "min", "max"
        )?;
        for s in rows {
            writeln!(
                out,
                "  {:<32} {:>8} {:>10} {:>10} {:>10} {:>10}",
                session.data().name(s.name),
                s.calls,
                format_ns(header.ticks_to_ns(s.total_duration)),
                format_ns(header.ticks_to_ns(s.average_duration())),
                format_ns(header.ticks_to_ns(s.min_duration)),
                format_ns(header.ticks_to_ns(s.max_duration)),
            )?;
        }
    }
    Ok(())
}
