//! Per-type post-processing of loaded items.
//!
//! Rules are registered by exact content type name. Types without rules
//! pass through unchanged.

use std::collections::HashMap;

use serde_json::Value;

/// A post-processing rule applied to every item of one content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRule {
    /// Wrap a scalar field in a one-element list. Absent and `null` fields
    /// are left alone; lists are left alone.
    CoerceToList { field: String },
}

impl TypeRule {
    pub fn coerce_to_list(field: impl Into<String>) -> Self {
        TypeRule::CoerceToList {
            field: field.into(),
        }
    }

    /// Apply to one item. Non-object items are left alone.
    pub fn apply(&self, item: &mut Value) {
        match self {
            TypeRule::CoerceToList { field } => {
                let Some(value) = item.as_object_mut().and_then(|fields| fields.get_mut(field))
                else {
                    return;
                };
                if !value.is_array() && !value.is_null() {
                    *value = Value::Array(vec![value.take()]);
                }
            }
        }
    }
}

/// Registry of rules keyed by content type name
#[derive(Debug, Clone)]
pub struct Normalizers {
    rules: HashMap<String, Vec<TypeRule>>,
}

impl Default for Normalizers {
    /// Built-in rules: `humans.role` is always a list
    fn default() -> Self {
        Self::empty().with_rule("humans", TypeRule::coerce_to_list("role"))
    }
}

impl Normalizers {
    /// A registry without any rules
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Register a rule for a content type
    pub fn register(&mut self, type_name: impl Into<String>, rule: TypeRule) -> &mut Self {
        self.rules.entry(type_name.into()).or_default().push(rule);
        self
    }

    /// Builder form of [`Normalizers::register`]
    pub fn with_rule(mut self, type_name: impl Into<String>, rule: TypeRule) -> Self {
        self.register(type_name, rule);
        self
    }

    /// Rules registered for a content type
    pub fn rules_for(&self, type_name: &str) -> &[TypeRule] {
        self.rules.get(type_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Apply every rule registered for `type_name` to every item
    pub fn normalize(&self, type_name: &str, mut items: Vec<Value>) -> Vec<Value> {
        let rules = self.rules_for(type_name);
        if rules.is_empty() {
            return items;
        }

        for item in &mut items {
            for rule in rules {
                rule.apply(item);
            }
        }
        items
    }
}
