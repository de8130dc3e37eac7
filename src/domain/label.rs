//! Display labels for Gantt tasks
//!
//! Downstream renderers and saved views match on these strings, so token
//! order and punctuation are fixed.

use super::record::{ExecutionInstanceRecord, ExecutionTaskRecord, WorkPackageRecord};

/// `<name> (<woNumber>) [WP:<id>, AC:<aircraftId>]`, the work order part
/// only when non-empty
pub fn work_package_text(wp: &WorkPackageRecord) -> String {
    let mut text = wp.name.clone();
    if !wp.wo_number.is_empty() {
        text.push_str(&format!(" ({})", wp.wo_number));
    }
    text.push_str(&format!(" [WP:{}, AC:{}]", wp.id, wp.aircraft_id));
    text
}

/// `[Seq:<seq>, WP:<wp>, AC:<ac>] WT: <description>`, or `Task` in place of
/// the `WT:` part when the description is empty
pub fn task_text(task: &ExecutionTaskRecord) -> String {
    let base = if task.description.is_empty() {
        "Task".to_string()
    } else {
        format!("WT: {}", task.description)
    };

    format!(
        "[Seq:{}, WP:{}, AC:{}] {}",
        task.task_seq, task.work_package_id, task.aircraft_id, base
    )
}

pub fn instance_text(instance: &ExecutionInstanceRecord) -> String {
    format!("ExecInstance:{}] ExecInstance", instance.seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_package_without_order_number() {
        let wp = WorkPackageRecord::new(7, 3, "Engine Check");
        assert_eq!(work_package_text(&wp), "Engine Check [WP:7, AC:3]");
    }

    #[test]
    fn work_package_with_order_number() {
        let mut wp = WorkPackageRecord::new(7, 3, "Engine Check");
        wp.wo_number = "WO-4411".to_string();
        assert_eq!(work_package_text(&wp), "Engine Check (WO-4411) [WP:7, AC:3]");
    }

    #[test]
    fn work_package_with_empty_name_keeps_suffix() {
        let wp = WorkPackageRecord::new(1, 2, "");
        assert_eq!(work_package_text(&wp), " [WP:1, AC:2]");
    }

    #[test]
    fn task_with_description() {
        let task = ExecutionTaskRecord::new(4, 7, 3, "Replace filter");
        assert_eq!(task_text(&task), "[Seq:4, WP:7, AC:3] WT: Replace filter");
    }

    #[test]
    fn task_without_description_falls_back() {
        let task = ExecutionTaskRecord::new(4, 7, 3, "");
        assert_eq!(task_text(&task), "[Seq:4, WP:7, AC:3] Task");
    }

    #[test]
    fn instance_template() {
        let instance = ExecutionInstanceRecord::new(12, None, None);
        assert_eq!(instance_text(&instance), "ExecInstance:12] ExecInstance");
    }
}
