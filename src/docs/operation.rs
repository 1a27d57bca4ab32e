// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The operation-document capability and its utoipa implementation.

use serde_json::Value;
use utoipa::openapi::{
    extensions::Extensions,
    header::Header,
    path::Operation,
    schema::{ObjectBuilder, Schema, Type},
    RefOr, Response,
};

/// Primitive type of a documented response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderType {
    Integer,
}

impl HeaderType {
    fn schema(self) -> RefOr<Schema> {
        let schema_type = match self {
            HeaderType::Integer => Type::Integer,
        };
        RefOr::T(Schema::Object(
            ObjectBuilder::new().schema_type(schema_type).build(),
        ))
    }
}

/// The mutable surface of one endpoint's generated documentation.
///
/// The enricher depends on this trait only, never on a concrete
/// documentation model.
pub trait OperationDocument {
    fn description(&self) -> Option<&str>;

    fn set_description(&mut self, description: String);

    fn has_security_requirements(&self) -> bool;

    /// Replace the security requirements with an explicit empty list.
    fn clear_security_requirements(&mut self);

    /// Create the response entry for `status` if it does not exist yet.
    fn ensure_response(&mut self, status: &str, default_description: &str);

    /// Add a header to the response entry for `status`, if that entry exists.
    fn add_response_header(
        &mut self,
        status: &str,
        name: &str,
        header_type: HeaderType,
        description: &str,
    );

    fn add_extension(&mut self, key: &str, value: Value);
}

impl OperationDocument for Operation {
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    fn has_security_requirements(&self) -> bool {
        self.security
            .as_ref()
            .is_some_and(|requirements| !requirements.is_empty())
    }

    fn clear_security_requirements(&mut self) {
        self.security = Some(Vec::new());
    }

    fn ensure_response(&mut self, status: &str, default_description: &str) {
        self.responses
            .responses
            .entry(status.to_string())
            .or_insert_with(|| RefOr::T(Response::new(default_description)));
    }

    fn add_response_header(
        &mut self,
        status: &str,
        name: &str,
        header_type: HeaderType,
        description: &str,
    ) {
        // Referenced responses are shared components and are left untouched.
        if let Some(RefOr::T(response)) = self.responses.responses.get_mut(status) {
            let mut header = Header::new(header_type.schema());
            header.description = Some(description.to_string());
            response.headers.insert(name.to_string(), header);
        }
    }

    fn add_extension(&mut self, key: &str, value: Value) {
        self.extensions
            .get_or_insert_with(Extensions::default)
            .insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::security::SecurityRequirement;

    #[test]
    fn ensure_response_keeps_existing_entries() {
        let mut operation = Operation::default();
        operation
            .responses
            .responses
            .insert("200".into(), RefOr::T(Response::new("Listed users")));

        operation.ensure_response("200", "Successful operation");
        operation.ensure_response("201", "Created");

        let RefOr::T(ok) = &operation.responses.responses["200"] else {
            panic!("expected inline response");
        };
        assert_eq!(ok.description, "Listed users");
        assert!(operation.responses.responses.contains_key("201"));
    }

    #[test]
    fn headers_are_added_to_existing_responses_only() {
        let mut operation = Operation::default();
        operation.add_response_header("200", "x-missing", HeaderType::Integer, "ignored");
        assert!(operation.responses.responses.is_empty());

        operation.ensure_response("200", "Successful operation");
        operation.add_response_header("200", "x-ratelimit-limit", HeaderType::Integer, "limit");

        let RefOr::T(ok) = &operation.responses.responses["200"] else {
            panic!("expected inline response");
        };
        let header = &ok.headers["x-ratelimit-limit"];
        assert_eq!(header.description.as_deref(), Some("limit"));
    }

    #[test]
    fn clearing_security_leaves_an_explicit_empty_list() {
        let mut operation = Operation::default();
        let bearer = SecurityRequirement::new("BearerAuth", Vec::<String>::new());
        operation.security = Some(vec![bearer]);
        assert!(operation.has_security_requirements());

        operation.clear_security_requirements();
        assert!(!operation.has_security_requirements());
        assert_eq!(operation.security.as_ref().map(Vec::len), Some(0));
    }

    #[test]
    fn extensions_are_created_on_demand() {
        let mut operation = Operation::default();
        operation.add_extension("x-public", Value::from("yes"));
        let extensions = operation.extensions.as_ref();
        assert_eq!(
            extensions.and_then(|e| e.get("x-public")),
            Some(&Value::from("yes"))
        );
    }
}
