//! Field definition file grammar
//!
//! ```text
//! file         ::= (include | rule)*
//! include      ::= "include" ["("] STRING [")"]
//! rule         ::= rule_decorator* json_id ("," json_id)* ":" [INDENT body UNDENT]
//! body         ::= ["@inherit_from(...)"] section*
//! section      ::= creator | derived | calculated | checker | producer | documentation
//! creator      ::= "creator" ":" INDENT creator_line+ UNDENT
//! creator_line ::= decorator* MASTER_FORMAT "," STRING "," expr
//! derived      ::= "derived" ":" INDENT decorator* expr UNDENT
//! calculated   ::= "calculated" ":" INDENT decorator* expr UNDENT
//! checker      ::= "checker" ":" INDENT (["@master_format(...)"] dotted_name "(...)")+ UNDENT
//! producer     ::= "producer" ":" INDENT (IDENT "," expr)+ UNDENT
//! documentation::= "documentation" ":" [INDENT [doc_string] ("@subfield" path ":" [doc_string])* UNDENT]
//! ```

use indexmap::IndexSet;
use smol_str::SmolStr;
use tracing::trace;

use super::decorators::{
    checker_scope, decorator, inherit_from_payload, legacy_payload,
    rule_decorators, sub_rule_decorators, unknown_decorator, unrecognized_format,
};
use crate::parser::ast::{
    Checker, CreatorLine, Documentation, ExprBody, FieldFile, FieldRule, Include, RuleBody,
    RuleMode,
};
use crate::parser::errors::{ErrorCode, ParseContext, SyntaxError};
use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind;

/// Section keywords of a rule body
pub const RULE_SECTIONS: &[&str] = &[
    "creator",
    "derived",
    "calculated",
    "checker",
    "producer",
    "documentation",
];

/// Parse a complete field definition file.
///
/// `master_formats` is the set of source formats accepted at the start of a
/// creator line and inside `@master_format(...)`.
pub fn parse_field_file(
    source: &str,
    master_formats: &IndexSet<SmolStr>,
) -> Result<FieldFile, SyntaxError> {
    let mut p = Parser::new(source);
    let mut file = FieldFile::default();
    while p.at_block_item(ParseContext::TopLevel)? {
        if at_include(&p) {
            file.includes.push(include(&mut p)?);
        } else {
            let rule = rule(&mut p, master_formats)?;
            trace!(json_id = %rule.json_id, "parsed field rule");
            file.rules.push(rule);
        }
    }
    Ok(file)
}

fn at_include(p: &Parser<'_>) -> bool {
    p.at_keyword("include")
        && matches!(
            p.nth(1).map(|t| t.kind),
            Some(SyntaxKind::L_PAREN) | Some(SyntaxKind::STRING)
        )
}

fn include(p: &mut Parser<'_>) -> Result<Include, SyntaxError> {
    let context = ParseContext::TopLevel;
    let keyword = p.expect_keyword("include", context)?;
    let parenthesized = p.eat(SyntaxKind::L_PAREN).is_some();
    let (path, _) = p.quoted_string(context)?;
    if parenthesized {
        p.expect(SyntaxKind::R_PAREN, context)?;
    }
    p.expect_end_of_line(context)?;
    Ok(Include {
        path,
        position: p.position(keyword.offset),
    })
}

fn rule(p: &mut Parser<'_>, master_formats: &IndexSet<SmolStr>) -> Result<FieldRule, SyntaxError> {
    let position = p.position(p.offset());
    let header = rule_decorators(p)?;

    let context = ParseContext::RuleHeader;
    let (json_id, _) = p.json_id(context)?;
    let mut aliases = Vec::new();
    while p.eat(SyntaxKind::COMMA).is_some() {
        aliases.push(p.json_id(context)?.0);
    }
    p.expect(SyntaxKind::COLON, context)?;
    p.expect_end_of_line(context)?;

    let mode = match (header.overrides, header.extends) {
        (Some(_), _) => RuleMode::Override,
        (None, Some(_)) => RuleMode::Extend,
        (None, None) => RuleMode::Create,
    };
    let mut rule = FieldRule {
        json_id,
        aliases,
        persistent_identifier: header.persistent_identifier,
        inherit_from: header.inherit_from,
        mode,
        hidden: header.hidden,
        position,
        ..FieldRule::default()
    };

    if p.at_indented_line() {
        p.expect_indent(ParseContext::RuleBody)?;
        let mut seen = Vec::new();
        while p.at_block_item(ParseContext::RuleBody)? {
            section(p, &mut rule, &mut seen, master_formats)?;
        }
        p.expect_undent(ParseContext::RuleBody)?;
    }
    Ok(rule)
}

fn section(
    p: &mut Parser<'_>,
    rule: &mut FieldRule,
    seen: &mut Vec<&'static str>,
    master_formats: &IndexSet<SmolStr>,
) -> Result<(), SyntaxError> {
    let context = ParseContext::RuleBody;

    if p.at_decorator() {
        let decorator = decorator(p, context)?;
        if decorator.name != "inherit_from" {
            return Err(unknown_decorator(p, &decorator, context, &["inherit_from"]));
        }
        if rule.inherit_from.is_some() {
            return Err(p.error_at(
                decorator.range,
                ErrorCode::E0303,
                format!("'{}' already declares what it inherits from", rule.json_id),
            ));
        }
        rule.inherit_from = Some(inherit_from_payload(p, &decorator)?);
        return p.expect_end_of_line(context);
    }

    let Some(keyword) = RULE_SECTIONS.iter().copied().find(|kw| p.at_section(kw)) else {
        let message = if p.nth(1).map(|t| t.kind == SyntaxKind::COLON).unwrap_or(false) {
            format!("unknown section {} {}", p.found(), context)
        } else {
            format!("expected a section, found {} {}", p.found(), context)
        };
        return Err(p
            .error_here(ErrorCode::E0302, message)
            .with_hint(format!("expected one of: {}", RULE_SECTIONS.join(", "))));
    };

    let group = match keyword {
        "creator" | "derived" | "calculated" => "definition",
        other => other,
    };
    if seen.contains(&group) {
        return Err(p.error_here(
            ErrorCode::E0303,
            format!("duplicate '{}' section in rule '{}'", keyword, rule.json_id),
        ));
    }
    seen.push(group);

    p.bump();
    p.expect(SyntaxKind::COLON, context)?;
    p.expect_end_of_line(context)?;

    match keyword {
        "creator" => {
            let lines = p.block(ParseContext::CreatorBlock, |p| creator_line(p, master_formats))?;
            rule.body = Some(RuleBody::Creator(lines));
        }
        "derived" => {
            rule.body = Some(RuleBody::Derived(expr_body(p, ParseContext::DerivedBlock)?));
        }
        "calculated" => {
            rule.body = Some(RuleBody::Calculated(expr_body(p, ParseContext::CalculatedBlock)?));
        }
        "checker" => {
            rule.checkers = p.block(ParseContext::CheckerBlock, |p| checker(p, master_formats))?;
        }
        "producer" => {
            rule.producers = p.block(ParseContext::ProducerBlock, producer)?;
        }
        _ => {
            rule.documentation = Some(documentation(p)?);
        }
    }
    Ok(())
}

fn creator_line(
    p: &mut Parser<'_>,
    master_formats: &IndexSet<SmolStr>,
) -> Result<CreatorLine, SyntaxError> {
    let context = ParseContext::CreatorBlock;
    let (decorators, legacy) = sub_rule_decorators(p, context)?;
    let position = p.position(p.offset());

    let format = p.ident(context)?;
    if !master_formats.contains(format.text) {
        return Err(unrecognized_format(p, format.range(), format.text, master_formats));
    }
    p.expect(SyntaxKind::COMMA, context)?;
    let (source_tags, _) = p.quoted_string(context)?;
    p.expect(SyntaxKind::COMMA, context)?;
    let (value, _) = p.expr(context)?;
    p.expect_end_of_line(context)?;

    let legacy = legacy
        .into_iter()
        .map(|payload| legacy_payload(p, payload, false))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CreatorLine {
        master_format: SmolStr::new(format.text),
        source_tags,
        value,
        decorators,
        legacy,
        position,
    })
}

/// Single decorated expression of a derived or calculated section
fn expr_body(p: &mut Parser<'_>, context: ParseContext) -> Result<ExprBody, SyntaxError> {
    p.expect_indent(context)?;
    let (decorators, legacy) = sub_rule_decorators(p, context)?;
    let position = p.position(p.offset());
    let (value, _) = p.expr(context)?;
    p.expect_end_of_line(context)?;
    p.expect_undent(context)?;

    let legacy = legacy
        .into_iter()
        .map(|payload| legacy_payload(p, payload, true))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ExprBody {
        value,
        decorators,
        legacy,
        position,
    })
}

fn checker(
    p: &mut Parser<'_>,
    master_formats: &IndexSet<SmolStr>,
) -> Result<Checker, SyntaxError> {
    let context = ParseContext::CheckerBlock;
    let master_formats = checker_scope(p, master_formats)?;
    let (name, _) = p.dotted_name(context)?;
    let (arguments, _) = p.arguments(context)?;
    p.expect_end_of_line(context)?;
    Ok(Checker {
        master_formats,
        function: last_segment(&name),
        arguments: arguments.to_string(),
    })
}

/// Function name without its module path
pub(crate) fn last_segment(dotted: &str) -> SmolStr {
    SmolStr::new(dotted.rsplit('.').next().unwrap_or(dotted))
}

fn producer(p: &mut Parser<'_>) -> Result<(SmolStr, String), SyntaxError> {
    let context = ParseContext::ProducerBlock;
    let code = p.ident(context)?;
    p.expect(SyntaxKind::COMMA, context)?;
    let (value, _) = p.expr(context)?;
    p.expect_end_of_line(context)?;
    Ok((SmolStr::new(code.text), value))
}

fn documentation(p: &mut Parser<'_>) -> Result<Documentation, SyntaxError> {
    let context = ParseContext::DocumentationBlock;
    let mut doc = Documentation::default();
    if !p.at_indented_line() {
        return Ok(doc);
    }
    p.expect_indent(context)?;
    if p.at_block_item(context)?
        && matches!(
            p.peek_kind(),
            Some(SyntaxKind::STRING) | Some(SyntaxKind::TRIPLE_STRING)
        )
    {
        doc.text = p.doc_string(context)?.0;
        p.expect_end_of_line(context)?;
    }
    while p.at_block_item(context)? {
        let decorator = decorator(p, context)?;
        if decorator.name != "subfield" || decorator.payload.is_some() {
            return Err(unknown_decorator(p, &decorator, context, &["subfield"]));
        }
        let (path, _) = p.dotted_name(context)?;
        p.expect(SyntaxKind::COLON, context)?;
        let text = if p.at_line_end() {
            String::new()
        } else {
            p.doc_string(context)?.0
        };
        p.expect_end_of_line(context)?;
        doc.subfields.insert(SmolStr::new(path), text);
    }
    p.expect_undent(context)?;
    Ok(doc)
}
