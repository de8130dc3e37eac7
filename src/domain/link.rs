//! End-to-start links between consecutive work packages
//!
//! Summary tasks are paired purely by adjacency in the flat task list: each
//! summary links to the next summary that follows it, whatever aircraft or
//! station the two belong to.

use super::gantt::{GanttLink, GanttTask, LinkType};
use super::id::IdAllocator;

/// Builds one `e2s` link per pair of consecutive summary tasks
///
/// Link ids come from the same allocator as the tasks, so call this only
/// after every task of the run has been emitted.
pub fn build_links(tasks: &[GanttTask], ids: &mut IdAllocator) -> Vec<GanttLink> {
    let summaries: Vec<&GanttTask> = tasks.iter().filter(|t| t.is_summary()).collect();

    summaries
        .windows(2)
        .map(|pair| GanttLink {
            id: ids.allocate(),
            link_type: LinkType::EndToStart,
            source: pair[0].id,
            target: pair[1].id,
        })
        .collect()
}
