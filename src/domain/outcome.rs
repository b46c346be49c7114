use crate::contract::AssertionFailure;

/// Shape a response body must have, checked on the decoded JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyShape {
    /// The body is neither decoded nor inspected.
    Any,
    /// A JSON object. Empty objects pass; `null` and arrays do not.
    Object,
    /// A JSON object carrying every listed property, whatever their values.
    ObjectWithFields(Vec<String>),
}

/// What a case accepts: a set of status codes plus a body shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedOutcome {
    pub statuses: Vec<u16>,
    pub shape: BodyShape,
}

impl ExpectedOutcome {
    pub fn new(statuses: Vec<u16>, shape: BodyShape) -> Self {
        Self { statuses, shape }
    }

    pub fn success() -> Self {
        Self::new(vec![200], BodyShape::Object)
    }

    pub fn server_error(statuses: Vec<u16>) -> Self {
        Self::new(
            statuses,
            BodyShape::ObjectWithFields(vec!["code".into(), "message".into()]),
        )
    }

    pub fn client_error(statuses: Vec<u16>) -> Self {
        Self::new(statuses, BodyShape::Any)
    }

    /// Checks a response against the outcome.
    ///
    /// Returns the decoded body when the shape required decoding it.
    pub fn evaluate(
        &self,
        status: u16,
        body: &[u8],
    ) -> Result<Option<serde_json::Value>, AssertionFailure> {
        if !self.statuses.contains(&status) {
            return Err(AssertionFailure::UnexpectedStatus {
                expected: self.statuses.clone(),
                actual: status,
            });
        }

        let required_fields = match &self.shape {
            BodyShape::Any => return Ok(None),
            BodyShape::Object => &[][..],
            BodyShape::ObjectWithFields(fields) => fields.as_slice(),
        };

        let decoded: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| AssertionFailure::UndecodableBody(e.to_string()))?;
        let object = decoded
            .as_object()
            .ok_or_else(|| AssertionFailure::NotAnObject(json_kind(&decoded)))?;
        if let Some(missing) = required_fields
            .iter()
            .find(|field| !object.contains_key(field.as_str()))
        {
            return Err(AssertionFailure::MissingField(missing.clone()));
        }
        Ok(Some(decoded))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
