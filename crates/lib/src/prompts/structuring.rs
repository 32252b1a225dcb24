//! Prompts for turning an OCR transcript into the structured JSON document.

/// The system prompt defining the JSON schema the model must answer with.
pub const STRUCTURING_SYSTEM_PROMPT: &str = r#"Analyze the OCR text and structure it into a JSON format with the following schema:

{
  "metadata": {
    "document_date": "YYYY-MM-DD",
    "other_dates": [
      { "date": "YYYY-MM-DD", "event": "description" }
    ],
    "references": {
      "letters": [
        {
          "name": "letter reference",
          "page_number": "integer"
        }
      ],
      "clauses_articles_acts": [
        {
          "reference": "reference text",
          "type": "clause | article | act",
          "page_number": "integer"
        }
      ],
      "persons": [
        {
          "name": "person name",
          "role": "person role",
          "page_number": "integer"
        }
      ]
    }
  },
  "content": [
    {
      "type": "one of: title, paragraph, list, table, figure, header, footer",
      "text": "content text",
      "page_number": "integer",
      "metadata": {
        "additional_info": "any relevant additional information"
      }
    }
  ]
}

For tables, include both raw text and formatted HTML/markdown.
For figures, include bbox coordinates if available.
Ensure all dates are in YYYY-MM-DD format.
Return the response as a valid JSON string.
You must return a valid JSON object without ant additional info and delimeters following this exact schema. Ensure all values are properly formatted and quoted."#;

/// Prefix of the user turn; the OCR transcript follows it.
pub const STRUCTURING_USER_PREFIX: &str =
    "Process and structure this OCR text into the specified JSON format:\n\n";

/// Builds the user turn for a transcript.
pub fn structuring_user_prompt(transcript: &str) -> String {
    format!("{STRUCTURING_USER_PREFIX}{transcript}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_lists_every_block_type() {
        assert!(STRUCTURING_SYSTEM_PROMPT
            .contains("one of: title, paragraph, list, table, figure, header, footer"));
        assert!(STRUCTURING_SYSTEM_PROMPT.starts_with("Analyze the OCR text"));
        assert!(STRUCTURING_SYSTEM_PROMPT.ends_with("properly formatted and quoted."));
    }

    #[test]
    fn user_prompt_appends_transcript_after_blank_line() {
        assert_eq!(
            structuring_user_prompt("Section 1: Intro"),
            "Process and structure this OCR text into the specified JSON format:\n\nSection 1: Intro"
        );
    }
}
