//! Node arena, builder and traversal.
//!
//! A tree is a flat `Vec<Node>` addressed by [`NodeId`]. Condition nodes
//! branch to a `yes` or `no` child; action nodes either finish the walk or
//! hand control to their `fallback`. The builder validates the wiring once
//! so traversal never has to.

use thiserror::Error;

use super::action::{Action, ActionOutcome};
use super::condition::Condition;
use super::BehaviorContext;

/// Stable handle to a node inside one [`BehaviorTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A wired node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Condition {
        condition: Condition,
        yes: NodeId,
        no: NodeId,
    },
    Action {
        action: Action,
        fallback: Option<NodeId>,
    },
}

impl Node {
    /// Outgoing edges, in `yes`, `no`, `fallback` order.
    fn children(&self) -> impl Iterator<Item = NodeId> {
        let (a, b) = match *self {
            Node::Condition { yes, no, .. } => (Some(yes), Some(no)),
            Node::Action { fallback, .. } => (fallback, None),
        };
        a.into_iter().chain(b)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Node::Condition { condition, .. } => condition.name(),
            Node::Action { action, .. } => action.name(),
        }
    }
}

/// Wiring mistakes caught by [`TreeBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),
    #[error("condition node {0:?} is missing its yes/no branches")]
    MissingBranch(NodeId),
    #[error("node {0:?} is an action and cannot branch")]
    BranchOnAction(NodeId),
    #[error("node {0:?} is a condition and cannot have a fallback")]
    FallbackOnCondition(NodeId),
    #[error("node {0:?} is reachable from itself")]
    Cycle(NodeId),
}

#[derive(Debug, Clone)]
enum PendingKind {
    Condition(Condition),
    Action(Action),
}

#[derive(Debug, Clone)]
struct PendingNode {
    kind: PendingKind,
    yes: Option<NodeId>,
    no: Option<NodeId>,
    fallback: Option<NodeId>,
}

/// Collects nodes first and edges afterwards, then validates the result.
///
/// # Example
///
/// ```rust
/// use sunshine::sim::behavior::{Action, Condition, TreeBuilder};
///
/// let mut builder = TreeBuilder::new();
/// let detected = builder.condition(Condition::Detected);
/// let patrol = builder.action(Action::Patrol);
/// let flee = builder.action(Action::Flee);
/// builder.branch(detected, flee, patrol);
/// let tree = builder.build(detected).unwrap();
/// assert_eq!(tree.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    nodes: Vec<PendingNode>,
    /// Edge sources that named a node which does not exist
    dangling: Vec<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: PendingKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(PendingNode {
            kind,
            yes: None,
            no: None,
            fallback: None,
        });
        id
    }

    /// Adds an unwired condition node.
    pub fn condition(&mut self, condition: Condition) -> NodeId {
        self.push(PendingKind::Condition(condition))
    }

    /// Adds an action node without a fallback.
    pub fn action(&mut self, action: Action) -> NodeId {
        self.push(PendingKind::Action(action))
    }

    /// Adds an action node that hands over to `fallback` when it cannot act.
    pub fn action_with_fallback(&mut self, action: Action, fallback: NodeId) -> NodeId {
        let id = self.action(action);
        self.set_fallback(id, fallback);
        id
    }

    /// Wires the `yes`/`no` children of a condition.
    pub fn branch(&mut self, condition: NodeId, yes: NodeId, no: NodeId) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(condition.0) {
            node.yes = Some(yes);
            node.no = Some(no);
        } else {
            self.dangling.push(condition);
        }
        self
    }

    /// Wires the fallback of an action.
    pub fn set_fallback(&mut self, action: NodeId, fallback: NodeId) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(action.0) {
            node.fallback = Some(fallback);
        } else {
            self.dangling.push(action);
        }
        self
    }

    /// Validates the wiring and freezes the tree with `root` as entry point.
    pub fn build(self, root: NodeId) -> Result<BehaviorTree, TreeError> {
        let len = self.nodes.len();
        let check = |id: NodeId| if id.0 < len { Ok(id) } else { Err(TreeError::UnknownNode(id)) };

        if let Some(&id) = self.dangling.first() {
            return Err(TreeError::UnknownNode(id));
        }
        check(root)?;
        let mut nodes = Vec::with_capacity(len);
        for (index, pending) in self.nodes.into_iter().enumerate() {
            let id = NodeId(index);
            let node = match pending.kind {
                PendingKind::Condition(condition) => {
                    if pending.fallback.is_some() {
                        return Err(TreeError::FallbackOnCondition(id));
                    }
                    match (pending.yes, pending.no) {
                        (Some(yes), Some(no)) => Node::Condition {
                            condition,
                            yes: check(yes)?,
                            no: check(no)?,
                        },
                        _ => return Err(TreeError::MissingBranch(id)),
                    }
                }
                PendingKind::Action(action) => {
                    if pending.yes.is_some() || pending.no.is_some() {
                        return Err(TreeError::BranchOnAction(id));
                    }
                    Node::Action {
                        action,
                        fallback: pending.fallback.map(check).transpose()?,
                    }
                }
            };
            nodes.push(node);
        }

        detect_cycle(&nodes)?;
        Ok(BehaviorTree { nodes, root })
    }
}

/// Depth-first colouring over every node; any back edge is a cycle.
fn detect_cycle(nodes: &[Node]) -> Result<(), TreeError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; nodes.len()];
    for start in 0..nodes.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        // (node, children already pushed)
        let mut stack = vec![(NodeId(start), false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                marks[id.0] = Mark::Done;
                continue;
            }
            match marks[id.0] {
                Mark::Done => continue,
                Mark::InProgress => return Err(TreeError::Cycle(id)),
                Mark::Unvisited => {}
            }
            marks[id.0] = Mark::InProgress;
            stack.push((id, true));
            for child in nodes[id.0].children() {
                match marks[child.0] {
                    Mark::InProgress => return Err(TreeError::Cycle(child)),
                    Mark::Unvisited => stack.push((child, false)),
                    Mark::Done => {}
                }
            }
        }
    }
    Ok(())
}

/// The path a traversal took, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    pub path: Vec<NodeId>,
}

impl Trace {
    /// The node that ended the walk.
    pub fn leaf(&self) -> Option<NodeId> {
        self.path.last().copied()
    }
}

/// A validated, immutable decision tree.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl BehaviorTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks one root-to-leaf path, applying the chosen action to the agent.
    ///
    /// Every node is visited at most once per call.
    pub fn traverse(&self, ctx: &mut BehaviorContext<'_>) -> Trace {
        let mut trace = Trace {
            path: Vec::with_capacity(self.nodes.len()),
        };
        let mut current = Some(self.root);

        while let Some(id) = current {
            if trace.path.contains(&id) {
                log::error!("{}: node {:?} revisited, stopping traversal", ctx.enemy.name, id);
                break;
            }
            let Some(node) = self.nodes.get(id.0) else {
                break;
            };
            trace.path.push(id);

            current = match node {
                Node::Condition { condition, yes, no } => {
                    Some(if condition.evaluate(ctx) { *yes } else { *no })
                }
                Node::Action { action, fallback } => match action.perform(ctx) {
                    ActionOutcome::Done => None,
                    ActionOutcome::Fallback => {
                        log::trace!("{}: {} fell back", ctx.enemy.name, action.name());
                        *fallback
                    }
                },
            };
        }

        trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_missing_branch() {
        let mut builder = TreeBuilder::new();
        let detected = builder.condition(Condition::Detected);
        assert_eq!(builder.build(detected), Err(TreeError::MissingBranch(detected)));
    }

    #[test]
    fn test_build_rejects_unknown_root_and_child() {
        let mut builder = TreeBuilder::new();
        let patrol = builder.action(Action::Patrol);
        assert_eq!(
            builder.clone().build(NodeId(7)),
            Err(TreeError::UnknownNode(NodeId(7)))
        );

        builder.set_fallback(patrol, NodeId(3));
        assert_eq!(builder.build(patrol), Err(TreeError::UnknownNode(NodeId(3))));
    }

    #[test]
    fn test_build_rejects_edges_from_unknown_node() {
        let mut builder = TreeBuilder::new();
        let patrol = builder.action(Action::Patrol);
        builder.branch(NodeId(9), patrol, patrol);
        assert_eq!(builder.build(patrol), Err(TreeError::UnknownNode(NodeId(9))));
    }

    #[test]
    fn test_build_rejects_branch_on_action() {
        let mut builder = TreeBuilder::new();
        let patrol = builder.action(Action::Patrol);
        let flee = builder.action(Action::Flee);
        builder.branch(patrol, flee, flee);
        assert_eq!(builder.build(patrol), Err(TreeError::BranchOnAction(patrol)));
    }

    #[test]
    fn test_build_rejects_fallback_on_condition() {
        let mut builder = TreeBuilder::new();
        let visible = builder.condition(Condition::Visible);
        let flee = builder.action(Action::Flee);
        builder.branch(visible, flee, flee).set_fallback(visible, flee);
        assert_eq!(builder.build(visible), Err(TreeError::FallbackOnCondition(visible)));
    }

    #[test]
    fn test_build_rejects_fallback_cycle() {
        let mut builder = TreeBuilder::new();
        let patrol = builder.action(Action::Patrol);
        let find = builder.action_with_fallback(Action::FindVisibility, patrol);
        builder.set_fallback(patrol, find);
        assert!(matches!(builder.build(find), Err(TreeError::Cycle(_))));
    }

    #[test]
    fn test_build_accepts_shared_children() {
        // Two branches may lead to the same leaf; that is not a cycle
        let mut builder = TreeBuilder::new();
        let detected = builder.condition(Condition::Detected);
        let visible = builder.condition(Condition::Visible);
        let patrol = builder.action(Action::Patrol);
        let flee = builder.action(Action::Flee);
        builder.branch(detected, visible, patrol);
        builder.branch(visible, flee, patrol);

        let tree = builder.build(detected).unwrap();
        assert_eq!(tree.root(), detected);
        assert_eq!(tree.node(patrol).map(Node::name), Some("Patrol"));
        assert!(!tree.is_empty());
    }

    #[test]
    fn test_trace_leaf() {
        let trace = Trace {
            path: vec![NodeId(0), NodeId(2)],
        };
        assert_eq!(trace.leaf(), Some(NodeId(2)));
        assert_eq!(Trace::default().leaf(), None);
    }
}
