use watson_core::{Annotation, Lemmatizer, Normalizer, NormalizerConfig, StopWords};

/// Splits on whitespace; the lemma is the uppercased surface.
struct WhitespaceStub;

impl Lemmatizer for WhitespaceStub {
    fn annotate(&self, text: &str) -> Vec<Annotation> {
        text.split_whitespace().map(|w| Annotation::new(w, w.to_uppercase())).collect()
    }
}

#[test]
fn it_normalizes_and_stems() {
    let toks = Normalizer::new().normalize_document("Running Runners RUN! The café's menu.");
    // Stemming to "run" should appear
    assert!(toks.contains(&"run".to_string()));
    assert!(toks.contains(&"café".to_string()));
    assert!(toks.iter().all(|t| t != "!" && t != "."));
}

#[test]
fn it_filters_stopwords() {
    let toks = Normalizer::new().normalize_query("The quick brown fox and the lazy dog");
    assert!(!toks.contains(&"the".to_string()));
    assert!(!toks.contains(&"and".to_string()));
    assert_eq!(toks, vec!["quick", "brown", "fox", "lazi", "dog"]);
}

#[test]
fn short_texts_keep_their_stop_words() {
    let n = Normalizer::new();
    assert_eq!(n.normalize_query("To be or not"), vec!["to", "be", "or", "not"]);
    // punctuation does not count towards the four-token floor
    assert_eq!(n.normalize_query("to, be; or... not!"), vec!["to", "be", "or", "not"]);
}

#[test]
fn normalization_is_deterministic() {
    let n = Normalizer::new();
    let text = "What if something is in quotes, like the phrase \"To be, or not to be.\"";
    assert_eq!(n.normalize_query(text), n.normalize_query(text));
    assert_eq!(n.normalize_document(text), n.normalize_document(text));
}

#[test]
fn lemmatizer_is_swappable() {
    let n = Normalizer::with_lemmatizer(WhitespaceStub)
        .stop_words(StopWords::new(["THE"]))
        .document_config(NormalizerConfig { stem: false, lemmatize: true })
        .query_config(NormalizerConfig { stem: false, lemmatize: false });
    assert_eq!(n.normalize_document("the a b c d ?!"), vec!["A", "B", "C", "D"]);
    assert_eq!(n.normalize_query("the a b c d ?!"), vec!["the", "a", "b", "c", "d"]);
}
