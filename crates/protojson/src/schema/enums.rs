//! Enum descriptors.

use std::collections::HashMap;

use crate::error::SchemaError;

/// Bidirectional mapping between enum symbols and their numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    name: String,
    values: Vec<(String, i32)>,
    by_symbol: HashMap<String, i32>,
    by_number: HashMap<i32, usize>,
}

impl EnumDescriptor {
    /// Builds a descriptor; symbols and numbers must both be unique.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        let name = name.into();
        let mut out = Self {
            name,
            values: Vec::new(),
            by_symbol: HashMap::new(),
            by_number: HashMap::new(),
        };
        for (symbol, number) in values {
            let symbol = symbol.into();
            if out.by_symbol.contains_key(&symbol) {
                return Err(SchemaError::DuplicateEnumSymbol {
                    enum_name: out.name,
                    symbol,
                });
            }
            if out.by_number.contains_key(&number) {
                return Err(SchemaError::DuplicateEnumNumber {
                    enum_name: out.name,
                    number,
                });
            }
            out.by_symbol.insert(symbol.clone(), number);
            out.by_number.insert(number, out.values.len());
            out.values.push((symbol, number));
        }
        Ok(out)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number for a symbolic name.
    pub fn value_of(&self, symbol: &str) -> Option<i32> {
        self.by_symbol.get(symbol).copied()
    }

    /// Symbolic name for a number.
    pub fn name_of(&self, number: i32) -> Option<&str> {
        self.by_number
            .get(&number)
            .map(|&idx| self.values[idx].0.as_str())
    }

    /// Symbols in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&str, i32)> {
        self.values.iter().map(|(s, n)| (s.as_str(), *n))
    }
}
