// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_list_document(items: usize) -> String {
    let mut content = String::from("# Tasks\n\nSome paragraph content with _emphasis_ and **strong** words.\n\n");

    for i in 0..items {
        let indent = "  ".repeat(i % 3);
        if i % 2 == 0 {
            content.push_str(&format!("{indent}- [ ] item {i} with a few words\n"));
        } else {
            content.push_str(&format!("{indent}{}. numbered item {i}\n", i + 1));
        }
    }

    content
}
