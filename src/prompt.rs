//! Enhancement instruction sent as the system message of every request.
//!
//! The rule set is fixed; callers may append free-text requirements which
//! end up under a labeled heading after the rules.

/// Heading placed between the fixed rules and a caller-supplied addendum.
pub const ADDENDUM_HEADING: &str = "Additional requirements from user context:";

/// Fixed rule set for enhancing an OpenAPI/Swagger document.
pub const ENHANCEMENT_RULES: &str = "\
You are an API documentation expert and OpenAPI 3.0 rigorist. Your task is to ENHANCE the provided OpenAPI/Swagger specification WITHOUT breaking behavior.

Start from the given spec and do the following (preserve all existing paths, operations and schemas; only add or fix issues; do not invent new endpoints unless they are obviously missing from context, like a standard 404/429 error model):

1) Keep all existing goals and expand them:
   - Add meaningful, concise descriptions for paths, operations, parameters, request bodies, headers, and schemas.
   - Include realistic example values (request and response). Prefer complete, coherent examples over placeholders.
   - Introduce enums where applicable with clear descriptions; keep values stable and add x-enumDescriptions if helpful.
   - Improve parameter descriptions with type, units, constraints, and examples.
   - Add rich response examples for each status code and media type.
   - Ensure security definitions are correct and consistently applied.

2) Conform to OpenAPI 3.0.0 and JSON Schema:
   - Set \"openapi\": \"3.0.0\".
   - Ensure all component schemas are valid JSON Schema dialect.
   - Use readOnly/writeOnly appropriately on properties.

3) Operation quality:
   - Ensure every operation has:
     * a unique, stable operationId in lowerCamelCase matching ^[a-z][A-Za-z0-9]*$.
       - If missing, generate it from {resource}{Action} (e.g., getUserById, listOrders, createInvoice).
       - If duplicates exist, disambiguate deterministically (e.g., add By{ParamName} or With{Qualifier}).
     * a summary (at most 120 characters) and a helpful description.
     * proper tags (grouped by resource or domain); define tag descriptions in top-level \"tags\".

4) Parameters and requests:
   - For every parameter, set: in, name, required, schema (with type/format), description, example.
   - Use consistent casing conventions (header names are case-insensitive but document them in Title-Case, e.g., X-Request-Id).
   - Validate path templating: every {param} in a path must have a corresponding \"in: path\" parameter marked required: true.

5) Responses:
   - Prefer RFC 7807 problem details for errors (application/problem+json). Define a reusable ProblemDetail schema and reference it.
   - Include useful headers where applicable (RateLimit-Limit, RateLimit-Remaining, RateLimit-Reset, Retry-After, ETag, Location, X-Request-Id) and document them.

6) Schemas and reuse:
   - Deduplicate inline schemas into components.schemas and reference them via $ref inside the schema object.
   - Component schemas must not have the $schema keyword.
   - Add \"title\" and \"description\" to all schemas and important properties.
   - Provide default values where safe; otherwise prefer examples.

7) Security:
   - Define securitySchemes only once, in components.securitySchemes.
   - Apply security globally via top-level \"security\" unless specific operations are intentionally public (then set an empty array on those operations).

8) Servers and environments:
   - Define at least one server with a clear url and description.
   - Prefer templated servers with variables (e.g., {scheme}, {host}, {basePath}) and defaults for prod; optionally add staging/sandbox with descriptions.
   - Ensure paths don't duplicate basePath.

9) Versioning and compatibility:
   - DO NOT make breaking changes to request/response shapes. Changes must be additive or corrective (e.g., fixing obvious schema mismatches).
   - If a breaking fix is unavoidable, note it in the description and prefer adding new fields over changing types.

Finally, return ONLY the enhanced OpenAPI specification in JSON format, nothing else. Make it error free and compliant with the OpenAPI specification.";

/// The system instruction for one run.
///
/// Built once from the fixed rules plus an optional addendum and shared
/// read-only by every request of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction(String);

impl Instruction {
    /// Builds the instruction from [`ENHANCEMENT_RULES`] and an optional addendum.
    #[must_use]
    pub fn new(addendum: Option<&str>) -> Self {
        Self::compose(ENHANCEMENT_RULES, addendum.unwrap_or_default())
    }

    /// Composes `rules` with `addendum`.
    ///
    /// An empty addendum yields `rules` verbatim. Otherwise the addendum
    /// follows a newline and [`ADDENDUM_HEADING`].
    #[must_use]
    pub fn compose(rules: &str, addendum: &str) -> Self {
        if addendum.is_empty() {
            return Self(rules.to_string());
        }

        Self(format!("{rules}\n{ADDENDUM_HEADING}\n{addendum}"))
    }

    /// Returns the instruction text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Instruction {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_addendum_is_rules_verbatim() {
        let instruction = Instruction::compose("RULES", "");
        assert_eq!(instruction.as_str(), "RULES");
    }

    #[test]
    fn test_addendum_appended_under_heading() {
        let instruction = Instruction::compose("RULES", "Use British spelling.");
        assert_eq!(
            instruction.as_str(),
            "RULES\nAdditional requirements from user context:\nUse British spelling."
        );
    }

    #[test]
    fn test_default_uses_fixed_rules() {
        assert_eq!(Instruction::default().as_str(), ENHANCEMENT_RULES);
        assert_eq!(Instruction::new(Some("")).as_str(), ENHANCEMENT_RULES);
    }

    #[test]
    fn test_rules_ask_for_json_only() {
        assert!(ENHANCEMENT_RULES.contains("return ONLY the enhanced OpenAPI specification in JSON"));
    }
}
