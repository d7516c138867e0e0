//! Text fragments and the parameters bound inside them.

use model::core::{jdbc_type::JdbcType, value::Value};
use serde_json::Map;

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBinding {
    map_key: String,
    value: Value,
    jdbc_type: Option<JdbcType>,
}

impl ParameterBinding {
    pub fn new(map_key: impl Into<String>, value: Value) -> Self {
        Self {
            map_key: map_key.into(),
            value,
            jdbc_type: None,
        }
    }

    pub fn with_jdbc_type(mut self, jdbc_type: Option<JdbcType>) -> Self {
        self.jdbc_type = jdbc_type;
        self
    }

    pub fn map_key(&self) -> &str {
        &self.map_key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn jdbc_type(&self) -> Option<JdbcType> {
        self.jdbc_type
    }
}

/// Parameter bindings in the order their placeholders appear in the text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBindings {
    bindings: Vec<ParameterBinding>,
}

impl ParameterBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, binding: ParameterBinding) {
        self.bindings.push(binding);
    }

    pub fn extend(&mut self, other: ParameterBindings) {
        self.bindings.extend(other.bindings);
    }

    pub fn get(&self, map_key: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .find(|b| b.map_key == map_key)
            .map(|b| &b.value)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.map_key.as_str())
    }

    /// `(key, value)` pairs in textual order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|b| (b.map_key.as_str(), &b.value))
    }

    pub fn bindings(&self) -> &[ParameterBinding] {
        &self.bindings
    }

    /// A JSON object keyed by map key, preserving insertion order.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .bindings
            .iter()
            .map(|b| (b.map_key.clone(), b.value.to_json()))
            .collect::<Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl FromIterator<ParameterBinding> for ParameterBindings {
    fn from_iter<T: IntoIterator<Item = ParameterBinding>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentAndParameters {
    fragment: String,
    parameters: ParameterBindings,
}

impl FragmentAndParameters {
    pub fn new(fragment: impl Into<String>, parameters: ParameterBindings) -> Self {
        Self {
            fragment: fragment.into(),
            parameters,
        }
    }

    pub fn from_fragment(fragment: impl Into<String>) -> Self {
        Self::new(fragment, ParameterBindings::new())
    }

    pub fn with_parameter(mut self, binding: ParameterBinding) -> Self {
        self.parameters.push(binding);
        self
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn parameters(&self) -> &ParameterBindings {
        &self.parameters
    }

    pub fn map_fragment<F>(self, f: F) -> Self
    where
        F: FnOnce(String) -> String,
    {
        Self {
            fragment: f(self.fragment),
            parameters: self.parameters,
        }
    }

    pub fn into_parts(self) -> (String, ParameterBindings) {
        (self.fragment, self.parameters)
    }
}

/// Accumulates ordered fragments and merges their parameters.
#[derive(Debug, Clone, Default)]
pub struct FragmentCollector {
    fragments: Vec<String>,
    parameters: ParameterBindings,
}

impl FragmentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, fragment: FragmentAndParameters) {
        let (text, parameters) = fragment.into_parts();
        self.fragments.push(text);
        self.parameters.extend(parameters);
    }

    pub fn add_if_some(&mut self, fragment: Option<FragmentAndParameters>) {
        if let Some(fragment) = fragment {
            self.add(fragment);
        }
    }

    pub fn add_text(&mut self, text: impl Into<String>) {
        self.fragments.push(text.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn parameters(&self) -> &ParameterBindings {
        &self.parameters
    }

    pub fn to_fragment_and_parameters(self, separator: &str) -> FragmentAndParameters {
        self.to_fragment_and_parameters_with(separator, "", "")
    }

    pub fn to_fragment_and_parameters_with(
        self,
        separator: &str,
        prefix: &str,
        suffix: &str,
    ) -> FragmentAndParameters {
        let fragment = format!("{prefix}{}{suffix}", self.fragments.join(separator));
        FragmentAndParameters::new(fragment, self.parameters)
    }
}

impl FromIterator<FragmentAndParameters> for FragmentCollector {
    fn from_iter<T: IntoIterator<Item = FragmentAndParameters>>(iter: T) -> Self {
        let mut collector = FragmentCollector::new();
        for fragment in iter {
            collector.add(fragment);
        }
        collector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collector_joins_fragments_and_keeps_parameter_order() {
        let collector: FragmentCollector = vec![
            FragmentAndParameters::from_fragment("a = :p1")
                .with_parameter(ParameterBinding::new("p1", Value::Int(1))),
            FragmentAndParameters::from_fragment("b = :p2")
                .with_parameter(ParameterBinding::new("p2", Value::from("x"))),
        ]
        .into_iter()
        .collect();

        let result = collector.to_fragment_and_parameters_with(", ", "(", ")");
        assert_eq!(result.fragment(), "(a = :p1, b = :p2)");
        assert_eq!(result.parameters().keys().collect::<Vec<_>>(), vec!["p1", "p2"]);
        assert_eq!(result.parameters().get("p2"), Some(&Value::from("x")));
    }

    #[test]
    fn bindings_render_as_ordered_json() {
        let bindings: ParameterBindings = vec![
            ParameterBinding::new("p2", Value::Int(2)),
            ParameterBinding::new("p1", Value::Null),
        ]
        .into_iter()
        .collect();
        assert_eq!(bindings.to_json(), json!({"p2": 2, "p1": null}));
        assert_eq!(bindings.len(), 2);
    }
}
