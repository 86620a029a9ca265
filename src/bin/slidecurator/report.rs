//! Plain-text rendering of an open script.

use slidecurator::editor::selectors;
use slidecurator::EditorStore;

pub fn print_script(store: &EditorStore) {
    let state = store.state();

    for paragraph in store.paragraphs() {
        let marker = if selectors::is_paragraph_completed(paragraph) {
            "✓"
        } else {
            " "
        };
        println!("[{}] #{:<5} {}", marker, paragraph.id, paragraph.text);
        for selected in &paragraph.selected_slides {
            println!("          = {} ({:.2})", selected.slide_file, selected.score);
        }
        for candidate in &paragraph.slide_candidates {
            println!("          ? {} ({:.2})", candidate.slide_file, candidate.score);
        }
    }

    let available = selectors::library_for_assignment(state);
    println!();
    println!(
        "Library: {} slides, {} available, {} deleted",
        state.all_slides.len(),
        available.len(),
        state.deleted_slides.len()
    );
    for slide in &available {
        println!("  {:<30} {}", slide.slide_name, slide.slide_file);
    }

    let stats = store.completion_stats();
    println!();
    println!(
        "Completed: {}/{} paragraphs ({:.1}%), {} open",
        stats.completed, stats.total, stats.percentage, stats.open
    );
}
