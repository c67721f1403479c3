//! Model definition file grammar
//!
//! ```text
//! file          ::= (fields | documentation | checker)*
//! fields        ::= "fields" ":" [INDENT (inherit_from | field_item)+ UNDENT]
//! inherit_from  ::= "@inherit_from(" ARGS ")"
//! field_item    ::= json_id ["=" json_id]
//! documentation ::= "documentation" ":" [INDENT doc_string UNDENT]
//! checker       ::= "checker" ":" INDENT (dotted_name "(...)")+ UNDENT
//! ```
//!
//! Each section may appear at most once. An empty `fields:` section parses;
//! the model compiler rejects it like a missing one.

use super::decorators::{decorator, inherit_from_payload, unknown_decorator};
use super::field::last_segment;
use crate::parser::ast::{ModelChecker, ModelFieldItem, ModelFile};
use crate::parser::errors::{ErrorCode, ParseContext, SyntaxError};
use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind;

/// Section keywords of a model file
pub const MODEL_SECTIONS: &[&str] = &["fields", "documentation", "checker"];

/// Parse a complete model definition file.
pub fn parse_model_file(source: &str) -> Result<ModelFile, SyntaxError> {
    let mut p = Parser::new(source);
    let mut file = ModelFile::default();
    let mut seen: Vec<&'static str> = Vec::new();
    let context = ParseContext::TopLevel;

    while p.at_block_item(context)? {
        let Some(keyword) = MODEL_SECTIONS.iter().copied().find(|kw| p.at_section(kw)) else {
            return Err(p
                .error_here(
                    ErrorCode::E0302,
                    format!("expected a model section, found {} {}", p.found(), context),
                )
                .with_hint(format!("expected one of: {}", MODEL_SECTIONS.join(", "))));
        };
        if seen.contains(&keyword) {
            return Err(p.error_here(
                ErrorCode::E0303,
                format!("duplicate '{}' section; a model file describes one model", keyword),
            ));
        }
        seen.push(keyword);

        p.bump();
        p.expect(SyntaxKind::COLON, context)?;
        p.expect_end_of_line(context)?;

        match keyword {
            "fields" => file.fields = Some(fields(&mut p)?),
            "documentation" => file.documentation = Some(documentation(&mut p)?),
            _ => file.checkers = p.block(ParseContext::CheckerBlock, checker)?,
        }
    }
    Ok(file)
}

fn fields(p: &mut Parser<'_>) -> Result<Vec<ModelFieldItem>, SyntaxError> {
    if !p.at_indented_line() {
        return Ok(Vec::new());
    }
    p.block(ParseContext::ModelFields, field_item)
}

fn field_item(p: &mut Parser<'_>) -> Result<ModelFieldItem, SyntaxError> {
    let context = ParseContext::ModelFields;
    if p.at_decorator() {
        let decorator = decorator(p, context)?;
        if decorator.name != "inherit_from" {
            return Err(unknown_decorator(p, &decorator, context, &["inherit_from"]));
        }
        let parents = inherit_from_payload(p, &decorator)?;
        p.expect_end_of_line(context)?;
        return Ok(ModelFieldItem::InheritFrom(parents));
    }

    let position = p.position(p.offset());
    let (json_id, _) = p.json_id(context)?;
    let alias = if p.eat(SyntaxKind::EQ).is_some() {
        Some(p.json_id(context)?.0)
    } else {
        None
    };
    p.expect_end_of_line(context)?;
    Ok(ModelFieldItem::Field {
        json_id,
        alias,
        position,
    })
}

fn documentation(p: &mut Parser<'_>) -> Result<String, SyntaxError> {
    let context = ParseContext::DocumentationBlock;
    if !p.at_indented_line() {
        return Ok(String::new());
    }
    p.expect_indent(context)?;
    let (text, _) = p.doc_string(context)?;
    p.expect_end_of_line(context)?;
    p.expect_undent(context)?;
    Ok(text)
}

fn checker(p: &mut Parser<'_>) -> Result<ModelChecker, SyntaxError> {
    let context = ParseContext::CheckerBlock;
    let (name, _) = p.dotted_name(context)?;
    let (arguments, _) = p.arguments(context)?;
    p.expect_end_of_line(context)?;
    Ok(ModelChecker {
        function: last_segment(&name),
        arguments: arguments.to_string(),
    })
}
