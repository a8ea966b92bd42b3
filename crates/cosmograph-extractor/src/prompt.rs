//! System prompt and output schema for language-model extraction

use serde_json::json;

/// Instructions sent with every chunk
pub const SYSTEM_PROMPT: &str = "\
You are a knowledge graph extraction expert. Extract entities and relationships from the provided document.

For entities, identify:
- People: individuals mentioned by name or role
- Organizations: companies, agencies, departments, committees
- Government bodies: courts, legislatures, executive offices, tribal councils
- Legal concepts: definitions, regulations, rights, obligations, procedures
- Documents: laws, codes, ordinances, contracts, agreements referenced
- Locations: places, jurisdictions, addresses
- Dates: specific dates, time periods, deadlines

For relationships, identify connections like:
- \"defines\": entity A defines entity B
- \"references\": entity A references entity B
- \"amends\": entity A modifies entity B
- \"supersedes\": entity A replaces entity B
- \"establishes\": entity A creates entity B
- \"governs\": entity A has authority over entity B
- \"authorizes\": entity A grants power to entity B
- \"belongs_to\": entity A is part of entity B
- \"contains\": entity A includes entity B
- \"reports_to\": entity A is subordinate to entity B

Guidelines:
- Only extract clearly stated facts
- Use consistent entity IDs (lowercase, underscores for spaces)
- Category values should be lowercase: person, organization, government_body, legal_concept, document, location, date
- Relationship types should be lowercase with underscores

Output all extracted entities and relationships in the structured format.";

/// JSON Schema every chunk response must conform to
pub fn output_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "entities": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "category": { "type": "string" },
                        "description": { "type": "string" }
                    },
                    "required": ["id", "name", "category", "description"],
                    "additionalProperties": false
                }
            },
            "relationships": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "source_id": { "type": "string" },
                        "target_id": { "type": "string" },
                        "relationship_type": { "type": "string" }
                    },
                    "required": ["source_id", "target_id", "relationship_type"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["entities", "relationships"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_entity_and_relationship_kinds() {
        for kind in ["People", "Organizations", "Government bodies", "Locations", "Dates"] {
            assert!(SYSTEM_PROMPT.contains(kind), "missing {}", kind);
        }
        for relation in ["defines", "supersedes", "belongs_to", "reports_to"] {
            assert!(SYSTEM_PROMPT.contains(relation), "missing {}", relation);
        }
    }

    #[test]
    fn test_schema_is_closed() {
        let schema = output_schema();
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["properties"]["entities"]["items"]["additionalProperties"], false);
        assert_eq!(
            schema["properties"]["relationships"]["items"]["required"],
            json!(["source_id", "target_id", "relationship_type"])
        );
    }
}
