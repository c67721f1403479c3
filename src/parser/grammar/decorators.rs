//! Decorator parsing
//!
//! Decorators are written `@name` or `@name(payload)`, either on the line of
//! the item they decorate or on lines of their own directly above it, at the
//! same column.
//!
//! - Rule decorators: `@persistent_identifier`, `@inherit_from`, `@override`,
//!   `@extend`, `@hidden`
//! - Sub-rule decorators: `@legacy`, `@parse_first`, `@depends_on`,
//!   `@only_if`, `@only_if_value`, `@do_not_cache`
//! - Checker scope: `@master_format`

use indexmap::IndexSet;
use smol_str::SmolStr;
use text_size::TextRange;

use crate::base::constants::ALL_MASTER_FORMATS;
use crate::parser::ast::{LegacyEntry, LegacyPayload, LegacyTags, RuleDecorators};
use crate::parser::errors::{ErrorCode, ParseContext, SyntaxError};
use crate::parser::literal::{Literal, parse_literal};
use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind;

/// Decorators accepted in front of a rule identifier
pub const RULE_DECORATORS: &[&str] = &[
    "persistent_identifier",
    "inherit_from",
    "override",
    "extend",
    "hidden",
];

/// Decorators accepted in front of a creator line or derived/calculated value
pub const SUB_RULE_DECORATORS: &[&str] = &[
    "legacy",
    "parse_first",
    "depends_on",
    "only_if",
    "only_if_value",
    "only_if_master_value",
    "do_not_cache",
];

/// A decorator as written: its name and optional parenthesized payload
#[derive(Debug, Clone)]
pub(crate) struct Decorator<'a> {
    pub name: &'a str,
    pub range: TextRange,
    /// Full payload text, parentheses included
    pub payload: Option<(&'a str, TextRange)>,
}

impl<'a> Decorator<'a> {
    /// Payload text without the parentheses, trimmed
    pub fn arguments(&self) -> Option<&'a str> {
        self.payload
            .map(|(text, _)| text[1..text.len() - 1].trim())
    }
}

/// Parse `@name` with an optional `(payload)` directly after it.
pub(crate) fn decorator<'a>(
    p: &mut Parser<'a>,
    context: ParseContext,
) -> Result<Decorator<'a>, SyntaxError> {
    let at = p.expect(SyntaxKind::AT, context)?;
    let name = p.ident(context)?;
    let payload = if p.at(SyntaxKind::L_PAREN) {
        Some(p.balanced(SyntaxKind::L_PAREN, ParseContext::Decorator)?)
    } else {
        None
    };
    let end = payload.map(|(_, r)| r.end()).unwrap_or(name.end());
    Ok(Decorator {
        name: name.text,
        range: TextRange::new(at.offset, end),
        payload,
    })
}

/// After a decorator: stay on the line, or move to the next line of the
/// same block if the decorator ended its line.
pub(crate) fn continue_after_decorator(
    p: &mut Parser<'_>,
    context: ParseContext,
) -> Result<(), SyntaxError> {
    if !p.at_line_end() {
        return Ok(());
    }
    p.expect_end_of_line(context)?;
    if p.at_block_item(context)? {
        Ok(())
    } else {
        Err(p.error_here(
            ErrorCode::E0902,
            format!("expected the decorated item {}, found {}", context, p.found()),
        ))
    }
}

pub(crate) fn unknown_decorator(
    p: &Parser<'_>,
    decorator: &Decorator<'_>,
    context: ParseContext,
    known: &[&str],
) -> SyntaxError {
    p.error_at(
        decorator.range,
        ErrorCode::E0304,
        format!("unknown decorator '@{}' {}", decorator.name, context),
    )
    .with_hint(format!("expected one of: @{}", known.join(", @")))
}

fn require_payload<'a>(
    p: &Parser<'a>,
    decorator: &Decorator<'a>,
) -> Result<(&'a str, TextRange), SyntaxError> {
    decorator.payload.ok_or_else(|| {
        p.error_at(
            decorator.range,
            ErrorCode::E0902,
            format!("'@{}' requires a parenthesized argument", decorator.name),
        )
    })
}

fn reject_payload(p: &Parser<'_>, decorator: &Decorator<'_>) -> Result<(), SyntaxError> {
    match decorator.payload {
        Some((_, range)) => Err(p.error_at(
            range,
            ErrorCode::E0901,
            format!("'@{}' takes no arguments", decorator.name),
        )),
        None => Ok(()),
    }
}

/// Evaluate a payload as a literal value
pub(crate) fn literal(
    p: &Parser<'_>,
    (text, range): (&str, TextRange),
) -> Result<Literal, SyntaxError> {
    parse_literal(text).map_err(|err| {
        let start = range.start() + err.offset;
        let at = TextRange::empty(start.min(range.end()));
        p.error_at(at, ErrorCode::E0402, format!("malformed literal: {}", err.message))
            .with_hint("decorator payloads must be plain literals")
    })
}

fn shape_error(p: &Parser<'_>, range: TextRange, message: impl Into<String>) -> SyntaxError {
    p.error_at(range, ErrorCode::E0403, message)
}

// =============================================================================
// Rule decorators
// =============================================================================

/// Decorators collected in front of a rule identifier
#[derive(Debug, Clone, Default)]
pub(crate) struct RuleHeaderDecorators {
    pub persistent_identifier: Option<i64>,
    pub inherit_from: Option<Vec<SmolStr>>,
    pub overrides: Option<TextRange>,
    pub extends: Option<TextRange>,
    pub hidden: bool,
}

/// At a rule decorator or at the bare `override` / `extend` keyword
pub(crate) fn at_rule_prefix(p: &Parser<'_>) -> bool {
    if p.at_decorator() {
        return true;
    }
    (p.at_keyword("override") || p.at_keyword("extend"))
        && p.nth(1).map(|t| t.kind == SyntaxKind::IDENT).unwrap_or(false)
}

pub(crate) fn rule_decorators(
    p: &mut Parser<'_>,
) -> Result<RuleHeaderDecorators, SyntaxError> {
    let context = ParseContext::RuleHeader;
    let mut header = RuleHeaderDecorators::default();
    while at_rule_prefix(p) {
        if !p.at_decorator() {
            if let Some(keyword) = p.bump() {
                let slot = if keyword.text == "override" {
                    &mut header.overrides
                } else {
                    &mut header.extends
                };
                *slot = Some(keyword.range());
            }
            continue;
        }
        let decorator = decorator(p, context)?;
        match decorator.name {
            "persistent_identifier" => {
                let payload = require_payload(p, &decorator)?;
                match literal(p, payload)? {
                    Literal::Int(level) => header.persistent_identifier = Some(level),
                    other => {
                        return Err(shape_error(
                            p,
                            payload.1,
                            format!("persistent identifier must be an integer, found {}", other.type_name()),
                        ));
                    }
                }
            }
            "inherit_from" => {
                header.inherit_from = Some(inherit_from_payload(p, &decorator)?);
            }
            "override" => {
                reject_payload(p, &decorator)?;
                header.overrides = Some(decorator.range);
            }
            "extend" => {
                reject_payload(p, &decorator)?;
                header.extends = Some(decorator.range);
            }
            "hidden" => {
                reject_payload(p, &decorator)?;
                header.hidden = true;
            }
            _ => return Err(unknown_decorator(p, &decorator, context, RULE_DECORATORS)),
        }
        continue_after_decorator(p, context)?;
    }
    if let (Some(_), Some(extend)) = (header.overrides, header.extends) {
        return Err(p
            .error_at(extend, ErrorCode::E0306, "a rule cannot both override and extend a field")
            .with_hint("split the rule into an override rule and an extend rule"));
    }
    Ok(header)
}

/// `@inherit_from("a")` or `@inherit_from(("a", "b"))`
pub(crate) fn inherit_from_payload(
    p: &Parser<'_>,
    decorator: &Decorator<'_>,
) -> Result<Vec<SmolStr>, SyntaxError> {
    let payload = require_payload(p, decorator)?;
    let value = literal(p, payload)?;
    value
        .to_string_list()
        .map(|names| names.into_iter().map(SmolStr::from).collect())
        .ok_or_else(|| {
            shape_error(
                p,
                payload.1,
                format!("'@inherit_from' expects a name or a list of names, found {}", value.type_name()),
            )
        })
}

// =============================================================================
// Sub-rule decorators
// =============================================================================

/// Decorators in front of a creator line or a derived/calculated value.
///
/// Returns the decorators and the raw `@legacy` payloads in order.
pub(crate) fn sub_rule_decorators<'a>(
    p: &mut Parser<'a>,
    context: ParseContext,
) -> Result<(RuleDecorators, Vec<(&'a str, TextRange)>), SyntaxError> {
    let mut decorators = RuleDecorators::default();
    let mut legacy = Vec::new();
    while p.at_decorator() {
        let decorator = decorator(p, context)?;
        let slot = match decorator.name {
            "legacy" => {
                legacy.push(require_payload(p, &decorator)?);
                None
            }
            "do_not_cache" => {
                reject_payload(p, &decorator)?;
                decorators.do_not_cache = true;
                None
            }
            "parse_first" => Some(&mut decorators.parse_first),
            "depends_on" => Some(&mut decorators.depends_on),
            "only_if" => Some(&mut decorators.only_if),
            "only_if_value" | "only_if_master_value" => Some(&mut decorators.only_if_master_value),
            _ => return Err(unknown_decorator(p, &decorator, context, SUB_RULE_DECORATORS)),
        };
        if let Some(slot) = slot {
            require_payload(p, &decorator)?;
            *slot = decorator.arguments().map(str::to_string);
        }
        continue_after_decorator(p, context)?;
    }
    Ok((decorators, legacy))
}

/// Turn a `@legacy(...)` payload into entries.
///
/// On creator lines the payload is a list of `(tags, ..., subfield)` entries
/// and the format is the creator's. On derived and calculated values the
/// payload is `(format, entries)`.
pub(crate) fn legacy_payload(
    p: &Parser<'_>,
    payload: (&str, TextRange),
    with_format: bool,
) -> Result<LegacyPayload, SyntaxError> {
    let range = payload.1;
    let value = literal(p, payload)?;
    let (master_format, entries) = if with_format {
        match value.as_sequence() {
            Some([Literal::Str(format), entries]) => (Some(SmolStr::new(format)), entries.clone()),
            _ => {
                return Err(shape_error(
                    p,
                    range,
                    "'@legacy' here expects (master_format, entries)",
                ));
            }
        }
    } else {
        (None, value)
    };
    let entries = match entries.as_sequence() {
        Some(items) if !items.is_empty() && items.iter().all(|i| i.as_sequence().is_some()) => items
            .iter()
            .map(legacy_entry)
            .collect::<Option<Vec<_>>>(),
        _ => legacy_entry(&entries).map(|entry| vec![entry]),
    };
    let entries = entries.ok_or_else(|| {
        shape_error(
            p,
            range,
            "'@legacy' entries must be (tag or tags, ..., subfield) sequences of strings",
        )
    })?;
    Ok(LegacyPayload {
        master_format,
        entries,
    })
}

fn legacy_entry(entry: &Literal) -> Option<LegacyEntry> {
    if let Literal::Str(tag) = entry {
        return Some(LegacyEntry {
            tags: LegacyTags::One(tag.clone()),
            subfield: None,
        });
    }
    let items = entry.as_sequence()?;
    let tags = match items.first()? {
        Literal::Str(tag) => LegacyTags::One(tag.clone()),
        many => LegacyTags::Many(many.to_string_list()?),
    };
    let subfield = match items {
        [_] => None,
        [.., last] => Some(last.as_str()?.to_string()).filter(|s| !s.is_empty()),
        [] => None,
    };
    Some(LegacyEntry { tags, subfield })
}

// =============================================================================
// Checker scope
// =============================================================================

/// `@master_format(...)` in front of a checker; defaults to `all`
pub(crate) fn checker_scope(
    p: &mut Parser<'_>,
    master_formats: &IndexSet<SmolStr>,
) -> Result<Vec<SmolStr>, SyntaxError> {
    let context = ParseContext::CheckerBlock;
    let mut scope = None;
    while p.at_decorator() {
        let decorator = decorator(p, context)?;
        if decorator.name != "master_format" {
            return Err(unknown_decorator(p, &decorator, context, &["master_format"]));
        }
        let payload = require_payload(p, &decorator)?;
        let value = literal(p, payload)?;
        let formats = value.to_string_list().ok_or_else(|| {
            shape_error(
                p,
                payload.1,
                format!("'@master_format' expects a format or a list of formats, found {}", value.type_name()),
            )
        })?;
        for format in &formats {
            if format != ALL_MASTER_FORMATS && !master_formats.contains(format.as_str()) {
                return Err(unrecognized_format(p, payload.1, format, master_formats));
            }
        }
        scope = Some(formats.into_iter().map(SmolStr::from).collect());
        continue_after_decorator(p, context)?;
    }
    Ok(scope.unwrap_or_else(|| vec![SmolStr::new_static(ALL_MASTER_FORMATS)]))
}

pub(crate) fn unrecognized_format(
    p: &Parser<'_>,
    range: TextRange,
    format: &str,
    master_formats: &IndexSet<SmolStr>,
) -> SyntaxError {
    let known: Vec<&str> = master_formats.iter().map(SmolStr::as_str).collect();
    p.error_at(
        range,
        ErrorCode::E0305,
        format!("unrecognized master format '{}'", format),
    )
    .with_hint(format!("configured master formats: {}", known.join(", ")))
}
