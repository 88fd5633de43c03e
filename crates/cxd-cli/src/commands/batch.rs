use std::path::Path;

use anyhow::Context;
use cxd_config::CxdConfig;
use cxd_core::responses::{BatchRow, BatchSample};
use rayon::prelude::*;
use serde_jsonlines::{BufReadExt, JsonLinesWriter, json_lines, write_json_lines};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::BatchArgs;
use crate::commands::shared::is_stdin;
use crate::pipeline::Analyzer;
use crate::progress::Progress;

/// Handle `cxd batch`. Rows always come out as JSON Lines, in input order.
pub fn handle(args: &BatchArgs, config: &CxdConfig, _flags: &GlobalFlags) -> anyhow::Result<()> {
    let samples = read_samples(&args.input)?;
    tracing::debug!(samples = samples.len(), "loaded batch input");

    let analyzer = Analyzer::from_config(config);
    let rows = run(&analyzer, &samples, config.general.batch_threads)?;

    let labeled = rows.iter().filter(|row| !row.label.is_abstain()).count();
    let without_diagnostic = rows.iter().filter(|row| row.diagnostic.is_none()).count();
    tracing::info!(
        samples = rows.len(),
        labeled,
        without_diagnostic,
        "batch complete"
    );

    match &args.output {
        Some(path) => write_json_lines(path, &rows)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut writer = JsonLinesWriter::new(std::io::stdout().lock());
            writer.write_all(&rows).context("failed to write rows to stdout")?;
            writer.flush().context("failed to flush stdout")
        }
    }
}

/// Parse one sample per line; errors name the offending line.
pub fn read_samples(input: &Path) -> anyhow::Result<Vec<BatchSample>> {
    let numbered = |(index, sample): (usize, std::io::Result<BatchSample>)| {
        sample.with_context(|| format!("invalid sample on line {}", index + 1))
    };

    if is_stdin(input) {
        return std::io::stdin()
            .lock()
            .json_lines::<BatchSample>()
            .enumerate()
            .map(numbered)
            .collect();
    }

    json_lines(input)
        .with_context(|| format!("failed to open {}", input.display()))?
        .enumerate()
        .map(|item| numbered(item).with_context(|| input.display().to_string()))
        .collect()
}

/// Analyze every sample in parallel. `threads == 0` uses rayon's global pool.
pub fn run(analyzer: &Analyzer, samples: &[BatchSample], threads: usize) -> anyhow::Result<Vec<BatchRow>> {
    let progress = Progress::bar(samples.len() as u64, "samples");
    let analyze = || {
        samples
            .par_iter()
            .map(|sample| {
                let row = analyzer.analyze_sample(sample);
                progress.inc(1);
                row
            })
            .collect::<Vec<_>>()
    };

    let rows = if threads == 0 {
        analyze()
    } else {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("failed to build the batch thread pool")?
            .install(analyze)
    };
    progress.finish_clear();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use cxd_config::CxdConfig;
    use cxd_core::enums::FixCategory;
    use cxd_core::responses::{BatchRow, BatchSample};
    use cxd_core::source::SourceUnit;
    use pretty_assertions::assert_eq;

    use super::{read_samples, run};
    use crate::pipeline::Analyzer;

    const PROGRAM: &str = "#include <vector>\nint main() {\n    cout << 1;\n}\n";

    fn sample(error_text: &str, error_line: Option<u32>) -> BatchSample {
        BatchSample {
            source: PROGRAM.to_string(),
            error_text: error_text.to_string(),
            error_line,
        }
    }

    #[test]
    fn reads_samples_from_jsonl_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("samples.jsonl");
        let samples = vec![
            sample("C2065: cout: undeclared identifier", Some(3)),
            sample("out of heap space", None),
        ];
        serde_jsonlines::write_json_lines(&path, &samples).expect("write samples");

        assert_eq!(read_samples(&path).expect("samples parse"), samples);
    }

    #[test]
    fn malformed_sample_reports_its_line() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, r#"{{"source": "", "error_text": "C2065: x"}}"#).expect("write first line");
        writeln!(file, r#"{{"source": 42}}"#).expect("write second line");

        let error = read_samples(file.path()).expect_err("second line is not a sample");
        assert!(format!("{error:#}").contains("line 2"), "{error:#}");
    }

    #[test]
    fn rows_keep_input_order_on_a_dedicated_pool() {
        let mut config = CxdConfig::default();
        config.context.expand_bits_header = false;
        let analyzer = Analyzer::from_config(&config);

        let samples = vec![
            sample("C2065: cout: undeclared identifier", Some(3)),
            sample("out of heap space", Some(3)),
            sample("C2065: cout: undeclared identifier", None),
        ];
        let rows = run(&analyzer, &samples, 2).expect("pool builds");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label.category, Some(FixCategory::HeaderOrStdNamespace));
        assert!(rows[1].diagnostic.is_none());
        assert!(rows[1].label.is_abstain());
        assert!(rows[2].context.is_empty());
        assert!(rows.iter().all(|row| row.hash == SourceUnit::new(PROGRAM).content_hash()));
    }

    #[test]
    fn rows_are_written_as_json_lines() {
        let analyzer = Analyzer::from_config(&CxdConfig::default());
        let rows = run(&analyzer, &[sample("C2065: cout: undeclared identifier", Some(3))], 0)
            .expect("global pool");

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("rows.jsonl");
        serde_jsonlines::write_json_lines(&path, &rows).expect("write rows");

        let text = std::fs::read_to_string(&path).expect("read rows");
        assert_eq!(text.lines().count(), 1);
        let back: Vec<BatchRow> = serde_jsonlines::json_lines(&path)
            .expect("open rows")
            .collect::<std::io::Result<_>>()
            .expect("rows parse");
        assert_eq!(back, rows);
    }
}
