//! Two-level tokenizer for the schema DSL.
//!
//! A schema line looks like `Binary: left Box<Expr>, right Box<Expr>, operator Token`.
//!
//! 1. split on the first `:` into variant name and field list;
//! 2. split the field list on commas at bracket depth zero, so
//!    `HashMap<String, Expr>` stays a single type;
//! 3. split each field on its first whitespace run into name and type.
//!
//! Type text is opaque. The only thing we look at inside it is bracket
//! nesting and whether a second `name Type` pair got glued on without a comma.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Malformation, SchemaError};
use crate::ir::{Field, Schema, Variant};

/// A word after which more type text may follow: `&`, `*const`, `&'a`,
/// `mut`, `dyn`, `impl`, `unsafe extern "C" fn`, `for<'a>` and the like.
static TYPE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[&*]*(?:'[A-Za-z_][A-Za-z0-9_]*|mut|dyn|impl|const|unsafe|extern|fn|for(?:<.*>)?|where|as|"[^"]*")?$"#)
        .unwrap()
});

// ------------------------------- Front API -------------------------------- //

/// Parse every line of one schema. Stops at the first malformed line.
pub fn parse_schema<S: AsRef<str>>(base: &str, lines: &[S]) -> Result<Schema, SchemaError> {
    let base = base.trim();
    if base.is_empty() {
        return Err(SchemaError::EmptyBaseName);
    }
    let variants = lines
        .iter()
        .enumerate()
        .map(|(ix, line)| parse_variant(line.as_ref()).map_err(|reason| SchemaError::malformed(ix, reason)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Schema { base: base.to_string(), variants })
}

/// Parse a single `Name: field Type, ...` line.
pub fn parse_variant(line: &str) -> Result<Variant, Malformation> {
    let (name, field_list) = line
        .split_once(':')
        .ok_or(Malformation::MissingVariantSeparator)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Malformation::EmptyVariantName);
    }
    let fields = split_top_level(field_list)?
        .into_iter()
        .map(parse_field)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Variant { name: name.to_string(), fields })
}

/// Split one field spec on its first whitespace run.
pub fn parse_field(spec: &str) -> Result<Field, Malformation> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(Malformation::EmptyField);
    }
    let Some((name, ty)) = spec.split_once(char::is_whitespace) else {
        return Err(Malformation::MissingFieldType { field: spec.to_string() });
    };
    let ty = ty.trim();
    if runs_into_next_field(ty) {
        return Err(Malformation::MissingComma { field: name.to_string() });
    }
    Ok(Field::new(name, ty))
}

// ------------------------------- Tokenizer -------------------------------- //

/// Tracks `<>`, `()` and `[]` nesting. `->` is not a closing bracket.
#[derive(Default)]
struct Nesting {
    open: Vec<char>,
    prev: Option<char>,
}

impl Nesting {
    /// Feed one char; `Err` on a closer that does not match the innermost opener.
    fn step(&mut self, ch: char) -> Result<(), ()> {
        let prev = self.prev.replace(ch);
        let expected = match ch {
            '<' | '(' | '[' => {
                self.open.push(ch);
                return Ok(());
            }
            '>' if prev == Some('-') => return Ok(()),
            '>' => '<',
            ')' => '(',
            ']' => '[',
            _ => return Ok(()),
        };
        match self.open.pop() {
            Some(opener) if opener == expected => Ok(()),
            _ => Err(()),
        }
    }

    fn at_top(&self) -> bool {
        self.open.is_empty()
    }
}

/// Split a field list on commas that sit outside any brackets.
fn split_top_level(list: &str) -> Result<Vec<&str>, Malformation> {
    let mut nesting = Nesting::default();
    let mut parts = Vec::new();
    let mut start = 0;
    for (ix, ch) in list.char_indices() {
        if ch == ',' && nesting.at_top() {
            parts.push(&list[start..ix]);
            start = ix + 1;
            continue;
        }
        if nesting.step(ch).is_err() {
            return Err(unbalanced(&list[start..=ix]));
        }
    }
    if !nesting.at_top() {
        return Err(unbalanced(&list[start..]));
    }
    parts.push(&list[start..]);
    Ok(parts)
}

fn unbalanced(segment: &str) -> Malformation {
    Malformation::UnbalancedBrackets { field: segment.trim().to_string() }
}

/// Whitespace-separated words of a type at bracket depth zero.
fn top_level_words(ty: &str) -> Vec<&str> {
    let mut nesting = Nesting::default();
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    for (ix, ch) in ty.char_indices() {
        if ch.is_whitespace() && nesting.at_top() {
            if let Some(s) = start.take() {
                words.push(&ty[s..ix]);
            }
            continue;
        }
        // balance was already checked by `split_top_level`
        let _ = nesting.step(ch);
        start.get_or_insert(ix);
    }
    if let Some(s) = start {
        words.push(&ty[s..]);
    }
    words
}

/// `Box<Expr> right Box<Expr>` or `Int b`: every top-level word of a type
/// after the first must be joined to the one before it by a prefix
/// (`mut`, `dyn`, `&'a`, ...) or by `->` / `+`. Anything else is a second
/// field that lost its comma.
fn runs_into_next_field(ty: &str) -> bool {
    top_level_words(ty).windows(2).any(|pair| !continues_type(pair[0], pair[1]))
}

fn continues_type(prev: &str, word: &str) -> bool {
    matches!(word, "->" | "+") || matches!(prev, "->" | "+") || TYPE_PREFIX.is_match(prev)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, ty: &str) -> Field {
        Field::new(name, ty)
    }

    #[test]
    fn worked_example_parses_in_order() {
        let schema = parse_schema(
            "Expr",
            &["Binary: left Box<Expr>, right Box<Expr>, operator Token", "Literal: value String"],
        )
        .unwrap();
        assert_eq!(schema.base, "Expr");
        assert_eq!(schema.variants.len(), 2);
        assert_eq!(schema.variants[0].name, "Binary");
        assert_eq!(
            schema.variants[0].fields,
            vec![field("left", "Box<Expr>"), field("right", "Box<Expr>"), field("operator", "Token")]
        );
        assert_eq!(schema.variants[1].name, "Literal");
        assert_eq!(schema.variants[1].fields, vec![field("value", "String")]);
    }

    #[test]
    fn nested_generics_stay_verbatim() {
        let v = parse_variant("Call: callee Box<Expr>, arguments Vec<Box<Expr>>").unwrap();
        assert_eq!(v.fields[1], field("arguments", "Vec<Box<Expr>>"));
    }

    #[test]
    fn commas_inside_generics_are_not_field_separators() {
        let v = parse_variant("Env: values HashMap<String, Vec<Expr>>, parent Option<(Rc<Env>, usize)>").unwrap();
        assert_eq!(
            v.fields,
            vec![
                field("values", "HashMap<String, Vec<Expr>>"),
                field("parent", "Option<(Rc<Env>, usize)>"),
            ]
        );
    }

    #[test]
    fn colons_after_the_first_belong_to_types() {
        let v = parse_variant("Shared: inner std::rc::Rc<Expr>").unwrap();
        assert_eq!(v.fields, vec![field("inner", "std::rc::Rc<Expr>")]);
    }

    #[test]
    fn whitespace_is_trimmed_everywhere() {
        let a = parse_variant("Foo:  a   Int ,  b  Bool").unwrap();
        let b = parse_variant("Foo: a Int, b Bool").unwrap();
        assert_eq!(a, b);
        let padded = parse_variant("  Foo  :\ta\tInt").unwrap();
        assert_eq!(padded.name, "Foo");
        assert_eq!(padded.fields, vec![field("a", "Int")]);
    }

    #[test]
    fn type_prefixes_and_fn_pointers_are_kept() {
        let v = parse_variant("Hook: target &'a mut Expr, f fn(i32) -> i32, d Box<dyn Fn(&Expr) -> bool>")
            .unwrap();
        assert_eq!(
            v.fields,
            vec![
                field("target", "&'a mut Expr"),
                field("f", "fn(i32) -> i32"),
                field("d", "Box<dyn Fn(&Expr) -> bool>"),
            ]
        );
    }

    #[test]
    fn multi_word_types_are_kept() {
        let v = parse_variant(
            "Raw: p *const Expr, q & mut Expr, h dyn Fn(i32) -> i32 + Send, c unsafe extern \"C\" fn(), k for<'a> fn(&'a str)",
        )
        .unwrap();
        assert_eq!(
            v.fields,
            vec![
                field("p", "*const Expr"),
                field("q", "& mut Expr"),
                field("h", "dyn Fn(i32) -> i32 + Send"),
                field("c", "unsafe extern \"C\" fn()"),
                field("k", "for<'a> fn(&'a str)"),
            ]
        );
    }

    #[test]
    fn missing_separator_is_rejected() {
        assert_eq!(parse_variant("Binary left Box<Expr>"), Err(Malformation::MissingVariantSeparator));
    }

    #[test]
    fn missing_type_is_rejected() {
        assert_eq!(
            parse_variant("Literal: value"),
            Err(Malformation::MissingFieldType { field: "value".into() })
        );
        assert_eq!(
            parse_variant("Unary: operator Token, right"),
            Err(Malformation::MissingFieldType { field: "right".into() })
        );
    }

    #[test]
    fn empty_fields_are_rejected() {
        assert_eq!(parse_variant("Empty:"), Err(Malformation::EmptyField));
        assert_eq!(parse_variant("Foo: a Int,"), Err(Malformation::EmptyField));
        assert_eq!(parse_variant("Foo: a Int,, b Bool"), Err(Malformation::EmptyField));
        assert_eq!(parse_variant(" : a Int"), Err(Malformation::EmptyVariantName));
    }

    #[test]
    fn fields_run_together_are_rejected() {
        assert_eq!(
            parse_variant("Binary: left Box<Expr> right Box<Expr>, operator Token"),
            Err(Malformation::MissingComma { field: "left".into() })
        );
        assert_eq!(
            parse_variant("Var: name Token initializer Option<Expr>"),
            Err(Malformation::MissingComma { field: "name".into() })
        );
        assert_eq!(
            parse_variant("Foo: a Int b"),
            Err(Malformation::MissingComma { field: "a".into() })
        );
        assert_eq!(
            parse_variant("Foo: a Int B Bool"),
            Err(Malformation::MissingComma { field: "a".into() })
        );
    }

    #[test]
    fn unbalanced_brackets_are_rejected() {
        assert!(matches!(
            parse_variant("Bad: a Vec<Expr, b Int"),
            Err(Malformation::UnbalancedBrackets { .. })
        ));
        assert!(matches!(
            parse_variant("Bad: a Expr>, b Int"),
            Err(Malformation::UnbalancedBrackets { .. })
        ));
    }

    #[test]
    fn error_carries_line_index() {
        let err = parse_schema("Stmt", &["Print: expression Expr", "Var name Token"]).unwrap_err();
        assert_eq!(err, SchemaError::malformed(1, Malformation::MissingVariantSeparator));
    }

    #[test]
    fn empty_base_is_rejected() {
        let lines: [&str; 0] = [];
        assert_eq!(parse_schema("  ", &lines), Err(SchemaError::EmptyBaseName));
    }

    #[test]
    fn duplicate_variants_are_kept() {
        let schema = parse_schema("E", &["A: x Int", "A: y Int"]).unwrap();
        assert_eq!(schema.variants.len(), 2);
    }
}
