//! Copy-on-write sequence operations shared by lists and text
//!
//! None of these mutate `self`. Each "mutation" returns a fresh value and
//! every element handed out or stored is deep-copied.

use crate::error::EvalError;

use super::Value;

impl Value {
    /// Number of elements (characters, for text).
    ///
    /// # Errors
    ///
    /// Returns `TypeError` if the value is not a sequence.
    pub fn len(&self) -> Result<usize, EvalError> {
        match self {
            Value::List(items) => Ok(items.len()),
            Value::Text(s) => Ok(s.chars().count()),
            other => Err(not_a_sequence("len", other)),
        }
    }

    /// Element at `index`, as an independent copy.
    ///
    /// On text the element is a one-character text.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` for negative or too-large indices, `TypeError` for
    /// non-sequences.
    pub fn index(&self, index: f64) -> Result<Value, EvalError> {
        let len = self.len()?;
        let i = checked_index(index, len)?;
        match self {
            Value::List(items) => Ok(items[i].deep_copy()),
            Value::Text(s) => Ok(s
                .chars()
                .nth(i)
                .map(|c| Value::text(c.to_string()))
                .unwrap_or(Value::Null)),
            other => Err(not_a_sequence("index", other)),
        }
    }

    /// New sequence with `value` appended.
    ///
    /// Pushing onto text appends the display form of `value`.
    ///
    /// # Errors
    ///
    /// Returns `TypeError` if the value is not a sequence.
    pub fn push(&self, value: &Value) -> Result<Value, EvalError> {
        match self {
            Value::List(items) => {
                let mut result: Vec<Value> = items.iter().map(Value::deep_copy).collect();
                result.push(value.deep_copy());
                Ok(Value::list(result))
            }
            Value::Text(s) => Ok(Value::text(format!("{}{}", s, value))),
            other => Err(not_a_sequence("push", other)),
        }
    }

    /// New sequence without its last element. Popping an empty sequence
    /// yields an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns `TypeError` if the value is not a sequence.
    pub fn pop(&self) -> Result<Value, EvalError> {
        match self {
            Value::List(items) => {
                let keep = items.len().saturating_sub(1);
                Ok(Value::list(
                    items[..keep].iter().map(Value::deep_copy).collect(),
                ))
            }
            Value::Text(s) => {
                let mut result = s.as_str().to_string();
                result.pop();
                Ok(Value::text(result))
            }
            other => Err(not_a_sequence("pop", other)),
        }
    }

    /// New sequence with the element at `index` replaced by `value`.
    ///
    /// On text, the character is replaced by the display form of `value`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` for bad indices, `TypeError` for non-sequences.
    pub fn set(&self, index: f64, value: &Value) -> Result<Value, EvalError> {
        let len = self.len()?;
        let i = checked_index(index, len)?;
        match self {
            Value::List(items) => {
                let mut result: Vec<Value> = items.iter().map(Value::deep_copy).collect();
                result[i] = value.deep_copy();
                Ok(Value::list(result))
            }
            Value::Text(s) => {
                let replacement = value.to_string();
                let result: String = s
                    .chars()
                    .enumerate()
                    .map(|(pos, c)| {
                        if pos == i {
                            replacement.clone()
                        } else {
                            c.to_string()
                        }
                    })
                    .collect();
                Ok(Value::text(result))
            }
            other => Err(not_a_sequence("set", other)),
        }
    }
}

fn checked_index(index: f64, len: usize) -> Result<usize, EvalError> {
    let truncated = index.trunc();
    if truncated >= 0.0 && truncated < len as f64 {
        Ok(truncated as usize)
    } else {
        Err(EvalError::IndexOutOfBounds { index, len })
    }
}

fn not_a_sequence(op: &str, value: &Value) -> EvalError {
    EvalError::TypeError {
        message: format!("{} expects a list or text, found {}", op, value.type_name()),
    }
}
