//! Corpus assembly.

/// Concatenate documents as `"{filename}\n{trimmed text}\n\n"`, in the
/// order given.
pub fn aggregate<'a, I>(documents: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut corpus = String::new();
    for (filename, text) in documents {
        corpus.push_str(filename);
        corpus.push('\n');
        corpus.push_str(text.trim());
        corpus.push_str("\n\n");
    }
    corpus
}
