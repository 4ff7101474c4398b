// src/graph/task_graph.rs

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{Result, TaskpruneError};
use crate::graph::job::Job;
use crate::types::JobLabel;

/// Internal node structure: the job itself plus its immediate dependents.
#[derive(Debug, Clone, PartialEq)]
struct GraphNode {
    job: Job,
    /// Direct dependents: jobs that list this one in their `dependencies`.
    dependents: Vec<JobLabel>,
}

/// Immutable DAG of jobs keyed by label.
///
/// Iteration follows the order in which jobs were handed to [`TaskGraph::build`].
/// The reverse-dependency index is computed once at construction and is the
/// exact transpose of the forward edges.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskGraph {
    order: Vec<JobLabel>,
    nodes: HashMap<JobLabel, GraphNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

impl TaskGraph {
    /// Build a graph from a set of jobs.
    ///
    /// Fails on duplicate labels, dependencies on unknown labels, and cycles.
    /// Repeated entries in a job's `dependencies` are collapsed.
    pub fn build<I>(jobs: I) -> Result<Self>
    where
        I: IntoIterator<Item = Job>,
    {
        let mut order = Vec::new();
        let mut by_label: HashMap<JobLabel, Job> = HashMap::new();

        for mut job in jobs {
            let mut seen = HashSet::new();
            job.dependencies.retain(|dep| seen.insert(dep.clone()));

            if by_label.contains_key(&job.label) {
                return Err(TaskpruneError::DuplicateLabel(job.label));
            }
            order.push(job.label.clone());
            by_label.insert(job.label.clone(), job);
        }

        for label in &order {
            let job = &by_label[label];
            for dep in &job.dependencies {
                if !by_label.contains_key(dep) {
                    return Err(TaskpruneError::DanglingDependency {
                        job: label.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        let graph = Self::assemble(order, by_label);
        graph.detect_cycle()?;
        Ok(graph)
    }

    /// Wire up the reverse index. Assumes every dependency is present.
    fn assemble(order: Vec<JobLabel>, mut by_label: HashMap<JobLabel, Job>) -> Self {
        let mut nodes: HashMap<JobLabel, GraphNode> = HashMap::with_capacity(order.len());
        for label in &order {
            if let Some(job) = by_label.remove(label) {
                nodes.insert(
                    label.clone(),
                    GraphNode {
                        job,
                        dependents: Vec::new(),
                    },
                );
            }
        }

        for label in &order {
            let deps = nodes
                .get(label)
                .map(|n| n.job.dependencies.clone())
                .unwrap_or_default();

            for dep in deps {
                if let Some(dep_node) = nodes.get_mut(&dep) {
                    dep_node.dependents.push(label.clone());
                }
            }
        }

        Self { order, nodes }
    }

    /// Depth-first walk with an on-stack marker; the first back edge found is
    /// reported as the cycle path.
    fn detect_cycle(&self) -> Result<()> {
        let mut marks: HashMap<&str, Mark> = self
            .order
            .iter()
            .map(|label| (label.as_str(), Mark::Unvisited))
            .collect();

        for start in &self.order {
            if marks.get(start.as_str()) != Some(&Mark::Unvisited) {
                continue;
            }

            let mut stack: Vec<(&str, usize)> = vec![(start.as_str(), 0)];
            marks.insert(start.as_str(), Mark::OnStack);

            while let Some(frame) = stack.last_mut() {
                let (label, next) = *frame;
                let deps = &self.nodes[label].job.dependencies;

                if next >= deps.len() {
                    marks.insert(label, Mark::Done);
                    stack.pop();
                    continue;
                }

                frame.1 += 1;
                let dep = deps[next].as_str();
                match marks.get(dep).copied().unwrap_or(Mark::Done) {
                    Mark::Unvisited => {
                        marks.insert(dep, Mark::OnStack);
                        stack.push((dep, 0));
                    }
                    Mark::OnStack => {
                        let pos = stack.iter().position(|(l, _)| *l == dep).unwrap_or(0);
                        let mut path: Vec<JobLabel> =
                            stack[pos..].iter().map(|(l, _)| l.to_string()).collect();
                        path.push(dep.to_string());
                        return Err(TaskpruneError::Cycle { path });
                    }
                    Mark::Done => {}
                }
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.nodes.contains_key(label)
    }

    pub fn get(&self, label: &str) -> Option<&Job> {
        self.nodes.get(label).map(|n| &n.job)
    }

    /// Like [`TaskGraph::get`] but reports a missing label as an error.
    pub fn job(&self, label: &str) -> Result<&Job> {
        self.get(label)
            .ok_or_else(|| TaskpruneError::UnknownLabel(label.to_string()))
    }

    /// All jobs in insertion order.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.order.iter().map(move |label| &self.nodes[label].job)
    }

    /// All labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Immediate dependencies of a job.
    pub fn dependencies_of(&self, label: &str) -> Result<&[JobLabel]> {
        Ok(self.node(label)?.job.dependencies.as_slice())
    }

    /// Every job that `label` requires, directly or transitively.
    pub fn transitive_dependencies_of(&self, label: &str) -> Result<BTreeSet<JobLabel>> {
        let mut stack: Vec<&str> = self
            .dependencies_of(label)?
            .iter()
            .map(|s| s.as_str())
            .collect();
        let mut visited: BTreeSet<JobLabel> = BTreeSet::new();

        while let Some(current) = stack.pop() {
            if visited.contains(current) {
                continue;
            }
            visited.insert(current.to_string());

            if let Some(node) = self.nodes.get(current) {
                stack.extend(node.job.dependencies.iter().map(|s| s.as_str()));
            }
        }

        Ok(visited)
    }

    /// Jobs that require `label`, either directly or (with `transitive`) via
    /// any chain of dependencies.
    pub fn dependents_of(&self, label: &str, transitive: bool) -> Result<BTreeSet<JobLabel>> {
        let direct = &self.node(label)?.dependents;
        if !transitive {
            return Ok(direct.iter().cloned().collect());
        }

        let mut stack: Vec<&str> = direct.iter().map(|s| s.as_str()).collect();
        let mut visited: BTreeSet<JobLabel> = BTreeSet::new();

        while let Some(current) = stack.pop() {
            if visited.contains(current) {
                continue;
            }
            visited.insert(current.to_string());

            if let Some(node) = self.nodes.get(current) {
                stack.extend(node.dependents.iter().map(|s| s.as_str()));
            }
        }

        Ok(visited)
    }

    /// Vertex-induced subgraph over `labels`.
    ///
    /// Every included job must have all of its dependencies included as well;
    /// anything else is an optimizer bug and surfaces as
    /// [`TaskpruneError::IncompleteClosure`].
    pub fn induce<I, S>(&self, labels: I) -> Result<TaskGraph>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut wanted: HashSet<&str> = HashSet::new();
        for label in labels {
            let label = label.as_ref();
            let (key, _) = self
                .nodes
                .get_key_value(label)
                .ok_or_else(|| TaskpruneError::UnknownLabel(label.to_string()))?;
            wanted.insert(key.as_str());
        }

        let mut order = Vec::with_capacity(wanted.len());
        let mut by_label = HashMap::with_capacity(wanted.len());

        for label in self.order.iter().filter(|l| wanted.contains(l.as_str())) {
            let job = &self.nodes[label].job;
            if let Some(missing) = job.dependencies.iter().find(|d| !wanted.contains(d.as_str())) {
                return Err(TaskpruneError::IncompleteClosure {
                    job: label.clone(),
                    missing: missing.clone(),
                });
            }
            order.push(label.clone());
            by_label.insert(label.clone(), job.clone());
        }

        Ok(Self::assemble(order, by_label))
    }

    /// Jobs ordered so that every job comes after all of its dependencies.
    pub fn topological_order(&self) -> Result<Vec<&Job>> {
        // Edge direction: dep -> job.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for label in &self.order {
            graph.add_node(label.as_str());
        }
        for label in &self.order {
            for dep in &self.nodes[label].job.dependencies {
                graph.add_edge(dep.as_str(), label.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(sorted) => Ok(sorted.into_iter().map(|l| &self.nodes[l].job).collect()),
            Err(cycle) => Err(TaskpruneError::Cycle {
                path: vec![cycle.node_id().to_string()],
            }),
        }
    }

    fn node(&self, label: &str) -> Result<&GraphNode> {
        self.nodes
            .get(label)
            .ok_or_else(|| TaskpruneError::UnknownLabel(label.to_string()))
    }
}
