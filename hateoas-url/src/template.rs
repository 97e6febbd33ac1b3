//! RFC6570 URI template expansion (levels 1-4).

use hateoas_types::{HateoasError, HateoasResult, ParamValue};
use std::collections::BTreeMap;

/// Variable bindings used during expansion. Missing keys, nulls and empty
/// lists are all "undefined" and drop out of the expansion.
pub type TemplateVars = BTreeMap<String, ParamValue>;

/// RFC 3986 reserved characters, kept as-is by `+` and `#` expansions.
const RESERVED: &str = ":/?#[]@!$&'()*+,;=";

struct Operator {
    first: &'static str,
    separator: &'static str,
    named: bool,
    if_empty: &'static str,
    allow_reserved: bool,
}

impl Operator {
    fn parse(symbol: Option<char>) -> Option<(Self, bool)> {
        let (first, separator, named, if_empty, allow_reserved) = match symbol {
            Some('+') => ("", ",", false, "", true),
            Some('#') => ("#", ",", false, "", true),
            Some('.') => (".", ".", false, "", false),
            Some('/') => ("/", "/", false, "", false),
            Some(';') => (";", ";", true, "", false),
            Some('?') => ("?", "&", true, "=", false),
            Some('&') => ("&", "&", true, "=", false),
            _ => ("", ",", false, "", false),
        };
        let consumed = matches!(symbol, Some('+' | '#' | '.' | '/' | ';' | '?' | '&'));
        // `=`, `,`, `!`, `@` and `|` are reserved for future operators.
        if matches!(symbol, Some('=' | ',' | '!' | '@' | '|')) {
            return None;
        }
        Some((
            Self {
                first,
                separator,
                named,
                if_empty,
                allow_reserved,
            },
            consumed,
        ))
    }
}

struct VarSpec<'a> {
    name: &'a str,
    explode: bool,
    prefix: Option<usize>,
}

impl<'a> VarSpec<'a> {
    fn parse(raw: &'a str) -> HateoasResult<Self> {
        if let Some(name) = raw.strip_suffix('*') {
            return Ok(Self {
                name,
                explode: true,
                prefix: None,
            });
        }
        if let Some((name, len)) = raw.split_once(':') {
            let prefix = len.parse::<usize>().map_err(|_| {
                HateoasError::invalid_param(format!("invalid prefix modifier in '{raw}'"))
            })?;
            return Ok(Self {
                name,
                explode: false,
                prefix: Some(prefix),
            });
        }
        Ok(Self {
            name: raw,
            explode: false,
            prefix: None,
        })
    }
}

/// Expands every `{...}` expression in `template` against `vars`.
///
/// Fails on an unclosed expression or an unsupported operator.
pub fn expand(template: &str, vars: &TemplateVars) -> HateoasResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            HateoasError::invalid_param(format!("unclosed template expression in '{template}'"))
        })?;
        expand_expression(&after[..close], vars, &mut out)?;
        rest = &after[close + 1..];
    }

    if rest.contains('}') {
        return Err(HateoasError::invalid_param(format!(
            "unbalanced template expression in '{template}'"
        )));
    }
    out.push_str(rest);
    Ok(out)
}

fn expand_expression(expr: &str, vars: &TemplateVars, out: &mut String) -> HateoasResult<()> {
    let (op, consumed) = Operator::parse(expr.chars().next()).ok_or_else(|| {
        HateoasError::invalid_param(format!("unsupported template operator in '{{{expr}}}'"))
    })?;
    let body = if consumed { &expr[1..] } else { expr };

    let mut parts = Vec::new();
    for raw in body.split(',').filter(|raw| !raw.is_empty()) {
        let spec = VarSpec::parse(raw.trim())?;
        if let Some(part) = expand_var(&op, &spec, vars.get(spec.name)) {
            parts.push(part);
        }
    }

    if !parts.is_empty() {
        out.push_str(op.first);
        out.push_str(&parts.join(op.separator));
    }
    Ok(())
}

fn expand_var(op: &Operator, spec: &VarSpec<'_>, value: Option<&ParamValue>) -> Option<String> {
    let value = value?;
    match value {
        ParamValue::Null => None,
        ParamValue::List(items) => {
            let items: Vec<&str> = items.iter().filter_map(ParamValue::as_scalar).collect();
            if items.is_empty() {
                return None;
            }
            if spec.explode {
                let encoded: Vec<String> = items
                    .iter()
                    .map(|item| {
                        let item = encode(item, op.allow_reserved);
                        if op.named {
                            named(spec.name, &item, op.if_empty)
                        } else {
                            item
                        }
                    })
                    .collect();
                Some(encoded.join(op.separator))
            } else {
                let joined = items
                    .iter()
                    .map(|item| encode(item, op.allow_reserved))
                    .collect::<Vec<_>>()
                    .join(",");
                Some(if op.named {
                    named(spec.name, &joined, op.if_empty)
                } else {
                    joined
                })
            }
        }
        ParamValue::Text(text) | ParamValue::Resource(text) => {
            let text = match spec.prefix {
                Some(len) => text.chars().take(len).collect::<String>(),
                None => text.clone(),
            };
            let encoded = encode(&text, op.allow_reserved);
            Some(if op.named {
                named(spec.name, &encoded, op.if_empty)
            } else {
                encoded
            })
        }
    }
}

fn named(name: &str, value: &str, if_empty: &str) -> String {
    if value.is_empty() {
        format!("{name}{if_empty}")
    } else {
        format!("{name}={value}")
    }
}

/// Percent-encodes `value`, keeping unreserved characters and, when
/// `allow_reserved` is set, reserved characters and existing `%XX` triplets.
fn encode(value: &str, allow_reserved: bool) -> String {
    if !allow_reserved {
        return urlencoding::encode(value).into_owned();
    }

    let mut out = String::with_capacity(value.len());
    let bytes = value.as_bytes();
    for (idx, ch) in value.char_indices() {
        let is_triplet = ch == '%'
            && bytes.get(idx + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(idx + 2).is_some_and(u8::is_ascii_hexdigit);
        if is_triplet || RESERVED.contains(ch) {
            out.push(ch);
        } else {
            let mut buf = [0u8; 4];
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
    }
    out
}
