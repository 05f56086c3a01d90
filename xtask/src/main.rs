//! Register map generator for the DMA controller.
//!
//! Turns the generated `DMAC_CFG.h` configuration header into Rust source
//! containing one `dmac_sfr::dmac_registers!` invocation, so register names
//! are checked by the compiler instead of by the C preprocessor.
//!
//! # Overview
//!
//! - Collects every `#define DMAC_CFG_<NAME>_ADDRESS <offset>` line
//! - Accepts decimal and hex offsets, optional parentheses and C integer
//!   suffixes (`u`, `U`, `l`, `L`)
//! - Converts `SNAKE_CASE` register names to `PascalCase` variants
//! - Rejects malformed, duplicate or misaligned definitions
//! - Emits the registers sorted by offset
//!
//! # Usage
//!
//! ```ignore
//! cargo xtask gen-regs lab/DMAC_CFG.h
//! cargo xtask gen-regs lab/DMAC_CFG.h --enum DmacReg --out src/regs.rs
//! cargo xtask gen-regs --manifest path/to/Cargo.toml
//! ```
//!
//! # Notes
//!
//! - Defaults for `header`, `enum` and `out` are read from
//!   `[package.metadata.dmac-sfr]` in the manifest (the crate root
//!   `Cargo.toml` unless `--manifest` is given). Relative paths there are
//!   resolved against the manifest directory.
//! - Command-line arguments override the manifest.
//! - Without an output path the generated source is written to stdout.

use std::{
    collections::{BTreeMap, HashMap},
    env,
    error::Error,
    fs,
    path::{Path, PathBuf},
};

const XTASK_MANIFEST_DIR: &str = env!("CARGO_MANIFEST_DIR");

/// Prefix of every register offset define in `DMAC_CFG.h`
const DEFINE_PREFIX: &str = "DMAC_CFG_";

/// Suffix of every register offset define in `DMAC_CFG.h`
const DEFINE_SUFFIX: &str = "_ADDRESS";

/// Register width in bytes; offsets must be multiples of it
const REG_WIDTH: u64 = 4;

/// Enum name used when neither the command line nor the manifest sets one
const DEFAULT_ENUM: &str = "DmacReg";

/// One register definition taken from the header.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RegisterDef {
    /// Name as written between the prefix and suffix (`CH0_SRC_ADDR`)
    name: String,
    /// Rust variant name (`Ch0SrcAddr`)
    variant: String,
    /// Byte offset from the block base
    offset: u64,
    /// 1-based line in the header
    line: usize,
}

/// Generator settings after merging the manifest and the command line.
#[derive(Debug, Default, PartialEq, Eq)]
struct Settings {
    header: Option<PathBuf>,
    enum_name: Option<String>,
    out: Option<PathBuf>,
}

impl Settings {
    /// Fill unset fields from `other`.
    fn or(self, other: Settings) -> Settings {
        Settings {
            header: self.header.or(other.header),
            enum_name: self.enum_name.or(other.enum_name),
            out: self.out.or(other.out),
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("xtask: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || matches!(args[0].as_str(), "-h" | "--help" | "help") {
        print_usage();
        return Ok(());
    }

    match args.remove(0).as_str() {
        "gen-regs" => gen_regs(args),
        other => Err(format!("unknown command: {other}\nUse `cargo xtask --help`.").into()),
    }
}

fn print_usage() {
    eprintln!(
        "Usage:\n  cargo xtask gen-regs [<DMAC_CFG.h>] [--enum <Name>] [--out <file.rs>] [--manifest <Cargo.toml>]\n\nDefaults are read from [package.metadata.dmac-sfr] in the manifest;\ncommand-line arguments win. Without --out the source goes to stdout.\n",
    );
}

fn gen_regs(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    let mut cli = Settings::default();
    let mut manifest: Option<PathBuf> = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--enum" => cli.enum_name = Some(iter.next().ok_or("--enum needs a value")?),
            "--out" | "-o" => cli.out = Some(iter.next().ok_or("--out needs a value")?.into()),
            "--manifest" => manifest = Some(iter.next().ok_or("--manifest needs a value")?.into()),
            _ if arg.starts_with('-') => return Err(format!("unknown option: {arg}").into()),
            _ => {
                if cli.header.is_some() {
                    return Err(format!("unexpected argument: {arg}").into());
                }
                cli.header = Some(arg.into());
            }
        }
    }

    let manifest_path =
        manifest.unwrap_or_else(|| Path::new(XTASK_MANIFEST_DIR).join("..").join("Cargo.toml"));
    let from_manifest = if manifest_path.exists() {
        read_manifest_settings(&manifest_path)?
    } else {
        Settings::default()
    };

    let settings = cli.or(from_manifest);
    let header = settings
        .header
        .ok_or("missing <DMAC_CFG.h> (pass it or set `header` in the manifest)")?;
    let enum_name = settings.enum_name.unwrap_or_else(|| DEFAULT_ENUM.to_string());
    if !is_identifier(&enum_name) || enum_name == "Self" {
        return Err(format!("invalid enum name: {enum_name}").into());
    }

    let source = fs::read_to_string(&header)
        .map_err(|e| format!("cannot read {}: {e}", header.display()))?;
    let regs = parse_header(&source).map_err(|e| format!("{}: {e}", header.display()))?;

    let header_name = header
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| header.display().to_string());
    let rendered = render(&regs, &enum_name, &header_name);

    match settings.out {
        Some(out) => {
            fs::write(&out, rendered).map_err(|e| format!("cannot write {}: {e}", out.display()))?;
            eprintln!("xtask: wrote {} registers to {}", regs.len(), out.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Read `[package.metadata.dmac-sfr]` from a Cargo manifest.
fn read_manifest_settings(manifest_path: &Path) -> Result<Settings, Box<dyn Error>> {
    let manifest_str = fs::read_to_string(manifest_path)?;
    let manifest: toml::Value = manifest_str.parse()?;
    let manifest_dir = manifest_path
        .parent()
        .ok_or("manifest path has no parent")?;

    Ok(settings_from_manifest(&manifest, manifest_dir))
}

fn settings_from_manifest(manifest: &toml::Value, manifest_dir: &Path) -> Settings {
    let Some(table) = manifest
        .get("package")
        .and_then(|pkg| pkg.get("metadata"))
        .and_then(|meta| meta.get("dmac-sfr"))
    else {
        return Settings::default();
    };

    let path = |key: &str| {
        table
            .get(key)
            .and_then(|v| v.as_str())
            .map(|p| manifest_dir.join(p))
    };

    Settings {
        header: path("header"),
        enum_name: table
            .get("enum")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        out: path("out"),
    }
}

/// Collect the register offset defines from a `DMAC_CFG.h` source.
fn parse_header(source: &str) -> Result<Vec<RegisterDef>, String> {
    let mut regs: Vec<RegisterDef> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut by_variant: HashMap<String, usize> = HashMap::new();
    let mut by_offset: BTreeMap<u64, usize> = BTreeMap::new();

    let mut in_block_comment = false;
    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let code = strip_comments(raw, &mut in_block_comment);
        let Some((name, value)) = define_of(&code) else {
            continue;
        };
        let Some(reg_name) = name
            .strip_prefix(DEFINE_PREFIX)
            .and_then(|n| n.strip_suffix(DEFINE_SUFFIX))
            .filter(|n| !n.is_empty())
        else {
            continue;
        };

        let offset = parse_int(&value)
            .ok_or_else(|| format!("line {line_no}: cannot parse offset `{value}` of {name}"))?;
        if offset % REG_WIDTH != 0 {
            return Err(format!(
                "line {line_no}: {reg_name} offset {offset:#x} is not a multiple of {REG_WIDTH}"
            ));
        }

        let variant = to_variant(reg_name);
        if variant == "Self" {
            return Err(format!(
                "line {line_no}: {reg_name} maps to `Self`, which is a reserved identifier"
            ));
        }
        if let Some(prev) = by_name.insert(reg_name.to_string(), line_no) {
            return Err(format!("line {line_no}: {reg_name} already defined on line {prev}"));
        }
        if let Some(prev) = by_variant.insert(variant.clone(), line_no) {
            return Err(format!(
                "line {line_no}: {reg_name} maps to `{variant}`, already used on line {prev}"
            ));
        }
        if let Some(prev) = by_offset.insert(offset, line_no) {
            return Err(format!(
                "line {line_no}: {reg_name} offset {offset:#x} already used on line {prev}"
            ));
        }

        regs.push(RegisterDef {
            name: reg_name.to_string(),
            variant,
            offset,
            line: line_no,
        });
    }

    if regs.is_empty() {
        return Err(format!("no {DEFINE_PREFIX}<NAME>{DEFINE_SUFFIX} definitions found"));
    }

    regs.sort_by_key(|reg| reg.offset);
    Ok(regs)
}

/// Drop `//` and `/* ... */` comments from one line.
///
/// `in_block` carries an unterminated `/*` over to the following lines.
fn strip_comments(line: &str, in_block: &mut bool) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    loop {
        if *in_block {
            match rest.find("*/") {
                Some(end) => {
                    rest = &rest[end + 2..];
                    *in_block = false;
                    out.push(' ');
                }
                None => break,
            }
        }

        let line_comment = rest.find("//");
        let block_comment = rest.find("/*");
        match (line_comment, block_comment) {
            (Some(l), Some(b)) if l < b => {
                out.push_str(&rest[..l]);
                break;
            }
            (Some(l), None) => {
                out.push_str(&rest[..l]);
                break;
            }
            (_, Some(b)) => {
                out.push_str(&rest[..b]);
                rest = &rest[b + 2..];
                *in_block = true;
            }
            (None, None) => {
                out.push_str(rest);
                break;
            }
        }
    }
    out
}

/// Split `#define NAME VALUE` into its name and value.
fn define_of(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim_start().strip_prefix('#')?.trim_start();
    let body = trimmed.strip_prefix("define")?;
    if !body.starts_with(char::is_whitespace) {
        return None;
    }

    let body = body.trim();
    let split = body.find(char::is_whitespace)?;
    let (name, value) = body.split_at(split);
    let value = value.trim();
    if name.contains('(') || value.is_empty() {
        return None;
    }
    Some((name.to_string(), value.to_string()))
}

/// Parse a C integer literal, with optional parentheses and suffixes.
fn parse_int(value: &str) -> Option<u64> {
    let mut v = value.trim();
    while let Some(inner) = v.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        v = inner.trim();
    }
    let v = v.trim_end_matches(['u', 'U', 'l', 'L']);

    if let Some(hex) = v.strip_prefix("0x").or_else(|| v.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else if v.len() > 1 && v.starts_with('0') {
        u64::from_str_radix(&v[1..], 8).ok()
    } else {
        v.parse().ok()
    }
}

/// `CH0_SRC_ADDR` -> `Ch0SrcAddr`
fn to_variant(name: &str) -> String {
    let mut variant = String::with_capacity(name.len());
    for part in name.split('_').filter(|p| !p.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            variant.push(first.to_ascii_uppercase());
            variant.extend(chars.map(|c| c.to_ascii_lowercase()));
        }
    }
    if variant.starts_with(|c: char| c.is_ascii_digit()) {
        variant.insert(0, 'R');
    }
    variant
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Render the register map as a `dmac_registers!` invocation.
fn render(regs: &[RegisterDef], enum_name: &str, header_name: &str) -> String {
    let digits = regs
        .iter()
        .map(|reg| format!("{:x}", reg.offset).len())
        .max()
        .unwrap_or(1)
        .max(3);

    let mut out = String::new();
    out.push_str(&format!(
        "// @generated by `cargo xtask gen-regs` from {header_name}. Do not edit.\n\n"
    ));
    out.push_str("dmac_sfr::dmac_registers! {\n");
    out.push_str(&format!("    /// DMA controller registers from `{header_name}`\n"));
    out.push_str(&format!("    pub enum {enum_name} {{\n"));
    for reg in regs {
        out.push_str(&format!(
            "        /// `{DEFINE_PREFIX}{}{DEFINE_SUFFIX}` (line {})\n",
            reg.name, reg.line
        ));
        out.push_str(&format!(
            "        {} = 0x{:0digits$x},\n",
            reg.variant, reg.offset
        ));
    }
    out.push_str("    }\n}\n");
    out
}
