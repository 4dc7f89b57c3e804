/// Request sent to the budget assistant for a free-text project description.
pub fn suggestion_prompt(description: &str) -> String {
    format!(
        "Based on the following description of a construction project, produce a detailed list \
         of budget lines with an estimated quantity and unit cost for each one. \
         Description: \"{}\"",
        description.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_prompt_quotes_description() {
        let prompt = suggestion_prompt("  Remodel a 10m2 bathroom ");
        assert!(prompt.ends_with("Description: \"Remodel a 10m2 bathroom\""));
    }
}
