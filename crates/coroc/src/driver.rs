//! Command implementations behind the `coroc` binary.
//!
//! [`generate`] backs `coroc gen` and writes lowered siblings of `.coro`
//! files. [`run`] executes a module and [`drive`] ticks one coroutine to
//! completion.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use coro_ast::Module;
use coro_ast::print::print_module;
use coro_runtime::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::diagnostics::{Diagnostic, emit_diagnostic, emit_transform_errors};
use crate::interp::{Output, Program};
use crate::parser::{self, SourceFile};
use crate::transform::{TransformOptions, transform_module};

#[derive(Debug, Clone, Default)]
pub struct GenOptions {
    /// Files, or directories searched (non-recursively) for `.coro` files.
    pub paths: Vec<PathBuf>,
    pub out_dir: Option<PathBuf>,
    /// Lower without writing anything.
    pub check: bool,
    /// Print generated code instead of writing files.
    pub stdout: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenSummary {
    pub written: Vec<PathBuf>,
    /// Inputs that are already generated.
    pub skipped: Vec<PathBuf>,
    /// Files lowered but not written (`--check` or `--stdout`).
    pub unwritten: usize,
    /// Coroutines lowered across all files.
    pub coroutines: usize,
}

enum FileOutcome {
    Written(PathBuf),
    Skipped,
    Unwritten,
}

fn transform_options(config: &Config) -> TransformOptions {
    TransformOptions {
        fn_suffix: config.fn_suffix.clone(),
    }
}

/// True for names produced by `coroc gen`, i.e. `<stem>.<suffix>.coro`.
pub fn is_generated_name(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(&format!(".{}.coro", suffix)))
}

fn is_coro_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "coro")
}

/// Expand `paths` into the source files to lower, in a stable order.
pub fn discover(paths: &[PathBuf], suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            let entries = std::fs::read_dir(path)
                .with_context(|| format!("failed to read directory {}", path.display()))?;
            for entry in entries {
                let entry = entry.with_context(|| format!("failed to read directory {}", path.display()))?;
                let p = entry.path();
                if is_coro_file(&p) && !is_generated_name(&p, suffix) {
                    found.push(p);
                }
            }
            found.sort();
            debug!(dir = %path.display(), files = found.len(), "scanned directory");
            files.extend(found);
        } else if is_generated_name(path, suffix) {
            warn!(file = %path.display(), "skipping generated file");
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Where the generated sibling of `source` is written.
pub fn output_path(source: &Path, out_dir: Option<&Path>, suffix: &str) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("cannot derive an output name from {}", source.display()))?;
    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    Ok(dir.join(format!("{}.{}.coro", stem, suffix)))
}

/// Header followed by the printed module.
pub fn render_output(header: &str, module: &Module) -> String {
    let mut out = String::new();
    if !header.is_empty() {
        out.push_str(header.trim_end());
        out.push_str("\n\n");
    }
    out.push_str(&print_module(module));
    out
}

/// Write through a temporary file in the target directory, then rename.
pub fn write_atomic(target: &Path, contents: &str) -> Result<()> {
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create a temporary file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write {}", target.display()))?;
    tmp.persist(target)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to write {}", target.display()))?;
    Ok(())
}

/// Lower a parsed source, reporting transform errors against it.
fn lower(config: &Config, source: &SourceFile) -> Result<(Module, usize)> {
    let mut module = source.module.clone();
    match transform_module(&mut module, &transform_options(config)) {
        Ok(report) => Ok((module, report.lowered.len())),
        Err(errors) => {
            emit_transform_errors(&errors, &source.path, &source.text);
            bail!("could not lower {} ({} error(s))", source.path, errors.len())
        }
    }
}

fn gen_file(
    config: &Config,
    options: &GenOptions,
    path: &Path,
    summary: &mut GenSummary,
) -> Result<FileOutcome> {
    let source = parser::load(path)?;
    if source.module.generated {
        info!(file = %path.display(), "already generated, skipping");
        return Ok(FileOutcome::Skipped);
    }
    let (module, coroutines) = lower(config, &source)?;
    summary.coroutines += coroutines;
    let text = render_output(&config.header, &module);

    if options.check {
        return Ok(FileOutcome::Unwritten);
    }
    if options.stdout {
        print!("{}", text);
        return Ok(FileOutcome::Unwritten);
    }
    let target = output_path(path, options.out_dir.as_deref(), &config.suffix)?;
    write_atomic(&target, &text)?;
    info!(source = %path.display(), output = %target.display(), coroutines, "wrote");
    Ok(FileOutcome::Written(target))
}

/// `coroc gen`. Every file is attempted; any failure fails the run.
pub fn generate(config: &Config, options: &GenOptions) -> Result<GenSummary> {
    let files = discover(&options.paths, &config.suffix)?;
    if files.is_empty() {
        bail!("no .coro files found");
    }
    let mut summary = GenSummary::default();
    let mut failed = 0;
    for path in &files {
        match gen_file(config, options, path, &mut summary) {
            Ok(FileOutcome::Written(target)) => summary.written.push(target),
            Ok(FileOutcome::Skipped) => summary.skipped.push(path.clone()),
            Ok(FileOutcome::Unwritten) => summary.unwritten += 1,
            Err(e) => {
                failed += 1;
                emit_diagnostic(&Diagnostic::simple(format!("{:#}", e)), None);
            }
        }
    }
    if failed > 0 {
        bail!("{} of {} file(s) failed", failed, files.len());
    }
    Ok(summary)
}

/// Load `path` for execution, lowering it in memory unless it is already
/// generated.
pub fn prepare(config: &Config, path: &Path, output: Output) -> Result<Rc<Program>> {
    let source = parser::load(path)?;
    let module = if source.module.generated {
        source.module
    } else {
        lower(config, &source)?.0
    };
    Ok(Program::load(&module, output))
}

/// `coroc run`: call the `entry` function.
pub fn run(config: &Config, path: &Path, entry: &str, output: Output) -> Result<()> {
    let program = prepare(config, path, output)?;
    program
        .call_function(entry, vec![])
        .with_context(|| format!("`{}` failed", entry))?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DriveOptions {
    pub coroutine: String,
    pub input: Option<i64>,
    /// Falls back to the configured `max_ticks`.
    pub max_ticks: Option<u64>,
}

/// `coroc drive`: tick one coroutine until it finishes, writing a line per
/// tick to `out`. Returns the number of ticks.
pub fn drive(
    config: &Config,
    path: &Path,
    options: &DriveOptions,
    output: Output,
    out: &mut dyn Write,
) -> Result<u64> {
    let program = prepare(config, path, output)?;
    let input = options.input.map_or(Value::Unit, Value::Int);
    let name = &options.coroutine;
    let co = program
        .create_coroutine(name, input)
        .with_context(|| format!("cannot create coroutine `{}`", name))?;

    let limit = options.max_ticks.unwrap_or(config.max_ticks);
    for i in 1..=limit {
        let tick = co
            .tick()
            .with_context(|| format!("tick #{} of `{}` failed", i, name))?;
        writeln!(out, "tick #{}: out={} done={}", i, tick.output, tick.done)?;
        if tick.done {
            debug!(coroutine = %name, ticks = i, "coroutine finished");
            return Ok(i);
        }
    }
    bail!("coroutine `{}` did not finish within {} ticks", name, limit)
}
