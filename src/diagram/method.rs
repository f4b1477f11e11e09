//! Method-Signature Parser
//!
//! `name(param, param): return` descriptors, where the name may be wrapped
//! in markup such as `<I>name</I>` for abstract methods.

use crate::types::{MethodDescriptor, TypeDescriptor, sorted_unique};

impl MethodDescriptor {
    /// Parse a method descriptor. Total over all strings.
    pub fn parse(descriptor: &str) -> Self {
        let (Some(open), Some(close)) = (descriptor.find('('), descriptor.rfind(')')) else {
            return Self::named(descriptor);
        };
        if close < open {
            return Self::named(descriptor);
        }

        // Last colon marks the return annotation unless it sits inside the params
        let return_start = match descriptor.rfind(':') {
            Some(colon) if colon > close => colon,
            _ => close,
        };

        let name = strip_markup(&descriptor[..open]);
        let parameters = split_parameters(descriptor[open + 1..close].trim())
            .into_iter()
            .map(TypeDescriptor::parse)
            .collect::<Vec<_>>();
        let return_descriptor =
            TypeDescriptor::from_type_expr(descriptor[return_start + 1..].trim());

        let aggregations = sorted_unique(
            parameters
                .iter()
                .chain(std::iter::once(&return_descriptor))
                .flat_map(|d| d.compositions.iter()),
        );

        Self {
            name,
            parameters,
            return_descriptor,
            aggregations,
        }
    }

    fn named(descriptor: &str) -> Self {
        Self {
            name: strip_markup(descriptor),
            ..Default::default()
        }
    }
}

/// Text between the first `>` and the last `</`, trimmed.
fn strip_markup(v: &str) -> String {
    let Some(gt) = v.find('>') else {
        return v.trim().to_string();
    };
    let begin = gt + 1;
    let end = match v.rfind("</") {
        Some(end) if end >= begin => end,
        _ => v.len(),
    };
    v[begin..end].trim().to_string()
}

/// Split on commas outside brackets. Empty segments are dropped.
fn split_parameters(v: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in v.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(v[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(v[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}
