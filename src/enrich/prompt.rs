/// Build the enrichment prompt for one batch. Names are listed 1-based; the model is told to key its
/// answer by the exact names. `context` (e.g. "NFL football") is appended as a hint when present.
pub fn build_prompt(names: &[String], context: Option<&str>) -> String {
    let listing = names
        .iter()
        .enumerate()
        .map(|(i, n)| format!("{}. {}", i + 1, n))
        .collect::<Vec<_>>()
        .join("\n");
    let example_key = names.first().map(String::as_str).unwrap_or("Player Name");
    let example_key = serde_json::to_string(example_key).unwrap_or_else(|_| "\"Player Name\"".into());
    let context_line = context
        .map(|c| format!("These athletes play {c}.\n\n"))
        .unwrap_or_default();

    format!(
        "You are a sports linguist. For the following list of athletes, provide:\n\
         1. phonetic: Simple phonetic spelling (e.g. LeBron James -> luh-BRON JAYMZ)\n\
         2. ipa: International Phonetic Alphabet (e.g. /ləˈbrɒn ˈdʒeɪmz/)\n\
         3. chinese: Standard simplified Chinese transliteration (e.g. 勒布朗·詹姆斯)\n\
         4. hardware_safe: ALL CAPS name without special characters.\n\n\
         {context_line}\
         Athletes:\n{listing}\n\n\
         IMPORTANT: Return a JSON object where the keys are the EXACT player names as provided in the list above.\n\
         DO NOT use numbers as keys. DO NOT include any other text.\n\n\
         Example Structure:\n\
         {{\n  {example_key}: {{ \"phonetic\": \"...\", \"ipa\": \"...\", \"chinese\": \"...\", \"hardware_safe\": \"...\" }}\n}}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_names_one_based_and_keys_example_by_first_name() {
        let names = vec!["Luka Doncic".to_string(), "Shai Gilgeous-Alexander".to_string()];
        let p = build_prompt(&names, Some("NBA basketball"));
        assert!(p.contains("1. Luka Doncic\n2. Shai Gilgeous-Alexander"));
        assert!(p.contains("\"Luka Doncic\": { \"phonetic\""));
        assert!(p.contains("These athletes play NBA basketball."));
        assert!(!build_prompt(&names, None).contains("These athletes play"));
    }
}
