use std::fmt::Write as _;
use std::path::Path;

use crate::error::Error;
use crate::types::BuildVariant;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where the operator
/// can act on it, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::CatalogInvalid { origin, reason } => render_catalog_invalid(origin, reason),
        Error::CatalogNotFound { path } => render_catalog_not_found(path),
        Error::FeedMalformed { line, reason } => render_feed_malformed(*line, reason),
        Error::UnknownPlaceholder { placeholder, section, variant } => {
            render_unknown_placeholder(placeholder, section, *variant)
        },
        Error::UnknownVariant { variant } => render_unknown_variant(*variant),
        Error::Io(_) | Error::Json(_) | Error::TomlDe(_) | Error::Watch { .. } => render_generic(e),
    };
}

fn render_generic(e: &Error) -> String {
    return match e {
        Error::Io(err) => format!("\
# Error: I/O

{err}
"),
        Error::Json(err) => format!("\
# Error: JSON

{err}
"),
        Error::TomlDe(err) => format!("\
# Error: Invalid TOML

{err}

## Fix

Check `.doclink.toml` and the catalog it names. Valid variants are
`community` and `enterprise`.
"),
        Error::Watch { reason } => format!("\
# Error: Watch Failed

{reason}

## Fix

Pump the feed once instead:

    doclink resolve <SECTION>... --feed <PATH>
"),
        _ => format!("\
# Error

{e}
"),
    };
}

fn render_catalog_invalid(origin: &Path, reason: &str) -> String {
    return format!("\
# Error: Catalog Invalid

`{}`: {reason}
", origin.display());
}

fn render_catalog_not_found(path: &Path) -> String {
    return format!("\
# Error: Catalog Not Found

`{}` does not exist.

## Fix

Check the `catalog` path in your `.doclink.toml`, or remove it to use the
built-in catalog.
", path.display());
}

fn render_feed_malformed(line: usize, reason: &str) -> String {
    return format!("\
# Error: Feed Malformed

Line {line} is neither `null` nor a summary object: {reason}

## Expected

One JSON value per line:

    null
    {{\"version\": \"ceph version 19.2.0 release squid\"}}
");
}

fn render_unknown_placeholder(placeholder: &str, section: &str, variant: BuildVariant) -> String {
    let mut out = format!("\
# Error: Unknown Placeholder

Template `{variant}.{section}` uses `{{{placeholder}}}`, which is not defined.
");
    out.push_str("\n## Fix\n\n");
    if section.starts_with("vars.") {
        let _ = writeln!(out, "Vars may only reference `{{version}}`.");
    } else {
        let _ = writeln!(out, "Define it under `[{variant}.vars]`:");
        let _ = writeln!(out);
        let _ = writeln!(out, "    [{variant}.vars]");
        let _ = writeln!(out, "    {placeholder} = \"https://docs.example/{{version}}/\"");
    }
    return out;
}

fn render_unknown_variant(variant: BuildVariant) -> String {
    return format!(
        "\
# Error: Unknown Variant

The catalog has no `[{variant}]` table.

## Fix

Add a `[{variant}]` table to the catalog, or pin a variant the catalog
provides in `.doclink.toml`:

    variant = \"community\"
"
    );
}
