//! Pre-order traversal of the work package hierarchy
//!
//! Visits each work package, then its tasks in stored order, then each
//! task's instances, before moving on. No sorting or filtering happens
//! here; callers prune with [`HierarchyWalker::skip_children`].

use std::fmt;

use super::gantt::TaskKind;
use super::record::{ExecutionInstanceRecord, ExecutionTaskRecord, WorkPackageRecord};

/// Depth of a node in the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    WorkPackage,
    Task,
    Instance,
}

impl Level {
    /// Returns the Gantt kind emitted for nodes at this level
    pub fn kind(&self) -> TaskKind {
        match self {
            Level::WorkPackage => TaskKind::Summary,
            Level::Task | Level::Instance => TaskKind::Task,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::WorkPackage => "work package",
            Level::Task => "execution task",
            Level::Instance => "execution instance",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position of a node: indices into the input and its child lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodePath {
    pub work_package: usize,
    pub task: Option<usize>,
    pub instance: Option<usize>,
}

impl NodePath {
    fn work_package(work_package: usize) -> Self {
        Self {
            work_package,
            task: None,
            instance: None,
        }
    }

    fn task(work_package: usize, task: usize) -> Self {
        Self {
            work_package,
            task: Some(task),
            instance: None,
        }
    }

    fn instance(work_package: usize, task: usize, instance: usize) -> Self {
        Self {
            work_package,
            task: Some(task),
            instance: Some(instance),
        }
    }
}

/// A borrowed record at some level
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    WorkPackage(&'a WorkPackageRecord),
    Task(&'a ExecutionTaskRecord),
    Instance(&'a ExecutionInstanceRecord),
}

/// One step of the traversal
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub node: Node<'a>,
    pub path: NodePath,
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    Start,
    At(NodePath),
    Done,
}

/// Lazy pre-order iterator over a work package slice
#[derive(Debug)]
pub struct HierarchyWalker<'a> {
    packages: &'a [WorkPackageRecord],
    cursor: Cursor,
    prune: bool,
}

impl<'a> HierarchyWalker<'a> {
    pub fn new(packages: &'a [WorkPackageRecord]) -> Self {
        Self {
            packages,
            cursor: Cursor::Start,
            prune: false,
        }
    }

    /// Skips the descendants of the node most recently returned by `next`
    pub fn skip_children(&mut self) {
        self.prune = true;
    }

    fn first_package(&self, from: usize) -> Option<NodePath> {
        (from < self.packages.len()).then(|| NodePath::work_package(from))
    }

    fn first_task(&self, wp: usize, from: usize) -> Option<NodePath> {
        if from < self.packages[wp].tasks.len() {
            Some(NodePath::task(wp, from))
        } else {
            self.first_package(wp + 1)
        }
    }

    fn first_instance(&self, wp: usize, task: usize, from: usize) -> Option<NodePath> {
        let instances = &self.packages[wp].tasks.as_slice()[task].instances;
        if from < instances.len() {
            Some(NodePath::instance(wp, task, from))
        } else {
            self.first_task(wp, task + 1)
        }
    }

    fn successor(&self, from: NodePath, descend: bool) -> Option<NodePath> {
        let wp = from.work_package;
        match (from.task, from.instance) {
            (None, _) if descend => self.first_task(wp, 0),
            (None, _) => self.first_package(wp + 1),
            (Some(task), None) if descend => self.first_instance(wp, task, 0),
            (Some(task), None) => self.first_task(wp, task + 1),
            (Some(task), Some(instance)) => self.first_instance(wp, task, instance + 1),
        }
    }

    fn node_at(&self, path: NodePath) -> Node<'a> {
        let packages: &'a [WorkPackageRecord] = self.packages;
        let wp = &packages[path.work_package];
        match (path.task, path.instance) {
            (None, _) => Node::WorkPackage(wp),
            (Some(task), None) => Node::Task(&wp.tasks.as_slice()[task]),
            (Some(task), Some(instance)) => {
                Node::Instance(&wp.tasks.as_slice()[task].instances.as_slice()[instance])
            }
        }
    }
}

impl<'a> Iterator for HierarchyWalker<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = match self.cursor {
            Cursor::Start => self.first_package(0),
            Cursor::At(path) => self.successor(path, !self.prune),
            Cursor::Done => None,
        };
        self.prune = false;

        match next {
            Some(path) => {
                self.cursor = Cursor::At(path);
                Some(Visit {
                    node: self.node_at(path),
                    path,
                })
            }
            None => {
                self.cursor = Cursor::Done;
                None
            }
        }
    }
}
