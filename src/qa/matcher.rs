/// Pick the context passage for a query: the first corpus entry that
/// contains the query as a case-insensitive substring, in corpus order.
///
/// Retrieval here is lexical, not semantic. The embedding vectors built
/// at startup are not consulted on this path.
pub fn find_context<'a, I>(query: &str, corpus: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = query.to_lowercase();
    corpus
        .into_iter()
        .find(|text| text.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::catalog::{Catalog, ProductRecord};

    fn catalog() -> Catalog {
        let rows = [
            ("Garlic Oil", "vedic virgin oil which is very helpful for digestion", "Beauty & Hygiene"),
            ("Water Bottle", "microwave safe orange bottle", "Kitchen"),
            ("Garlic Paste", "fresh paste made from garlic cloves", "Grocery"),
        ];

        let records = rows
            .iter()
            .enumerate()
            .map(|(id, (product, description, category))| ProductRecord {
                id,
                product: product.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                brand: String::new(),
                input_text: ProductRecord::compose(product, description),
            })
            .collect();

        Catalog::new(records)
    }

    #[test]
    fn returns_first_match_in_corpus_order() {
        let catalog = catalog();
        let found = find_context("garlic", catalog.input_texts()).unwrap();
        assert!(found.starts_with("Garlic Oil"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let catalog = catalog();
        let found = find_context("GARLIC", catalog.input_texts()).unwrap();
        assert!(found.starts_with("Garlic Oil"));

        let found = find_context("MICROWAVE safe", catalog.input_texts()).unwrap();
        assert!(found.starts_with("Water Bottle"));
    }

    #[test]
    fn no_match_returns_none() {
        let catalog = catalog();
        assert!(find_context("quantum toaster", catalog.input_texts()).is_none());
    }

    #[test]
    fn fields_outside_input_text_are_not_searched() {
        // "Hygiene" only appears in a category, which is not part of the
        // composed corpus.
        let catalog = catalog();
        assert!(find_context("Hygiene", catalog.input_texts()).is_none());
    }

    #[test]
    fn empty_query_matches_first_entry() {
        let catalog = catalog();
        let found = find_context("", catalog.input_texts()).unwrap();
        assert!(found.starts_with("Garlic Oil"));
    }
}
