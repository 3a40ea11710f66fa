use crate::errors::{TarsError, TarsResult};
use crate::parser::types::{ActionInputs, ParsedCall};

const BOX_PARAMS: [&str; 2] = ["start_box", "end_box"];

pub fn is_box_param(name: &str) -> bool {
    BOX_PARAMS.iter().any(|p| name.contains(p))
}

/// Turn raw call arguments into normalized inputs. Box parameters are scaled
/// into the unit interval; everything else passes through unchanged.
pub fn normalize_inputs(call: &ParsedCall, scale: f64) -> TarsResult<ActionInputs> {
    let mut inputs = ActionInputs::new();
    for (name, value) in &call.args {
        let normalized = if is_box_param(name) {
            let coords = normalize_box(name, value, scale)?;
            serde_json::to_string(&coords)?
        } else {
            value.clone()
        };
        inputs.insert(name.clone(), normalized);
    }
    Ok(inputs)
}

/// Decode `[x1,y1,x2,y2]` (or the point form `[x,y]`) from the model grid.
///
/// Brackets and parentheses are ignored. A point expands to a degenerate box.
pub fn normalize_box(param: &str, value: &str, scale: f64) -> TarsResult<[f64; 4]> {
    let malformed = |reason: String| TarsError::MalformedCoordinate {
        param: param.to_string(),
        value: value.to_string(),
        reason,
    };

    let stripped: String = value
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '(' | ')'))
        .collect();

    let numbers = stripped
        .split(',')
        .map(|token| {
            let token = token.trim();
            match token.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(n / scale),
                _ => Err(malformed(format!("'{token}' is not a finite number"))),
            }
        })
        .collect::<TarsResult<Vec<f64>>>()?;

    match numbers[..] {
        [x, y] => Ok([x, y, x, y]),
        [x1, y1, x2, y2] => Ok([x1, y1, x2, y2]),
        _ => Err(malformed(format!("expected 2 or 4 numbers, got {}", numbers.len()))),
    }
}
