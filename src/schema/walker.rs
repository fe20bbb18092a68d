//! Depth-first traversal of question schemas
//!
//! The walker descends in pre-order, keeping the current root-to-node path
//! on an explicit stack. Nodes at the schema's leaf depth produce leaf
//! summaries, flattened questions, visitor calls, or any mix of the three.
//! Output order always follows the stored order of `contents`/`children`.

use super::tree::{Category, FlatQuestion, LeafInfo, QuestionsSchema};

/// Callback receiving each question with its category path
pub type QuestionVisitor<'v, 'a, T> = dyn FnMut(&[&'a Category<T>], &'a T, bool) + 'v;

/// Which outputs a walk collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkMode {
    pub leafs: bool,
    pub questions: bool,
}

impl WalkMode {
    pub const LEAFS: Self = Self {
        leafs: true,
        questions: false,
    };
    pub const QUESTIONS: Self = Self {
        leafs: false,
        questions: true,
    };
    pub const ALL: Self = Self {
        leafs: true,
        questions: true,
    };
    /// Collect nothing; only the visitor runs
    pub const VISIT: Self = Self {
        leafs: false,
        questions: false,
    };
}

/// Results collected by [`QuestionsSchema::walk`]
#[derive(Debug)]
pub struct WalkOutput<'a, T> {
    pub leafs: Vec<LeafInfo>,
    pub questions: Vec<FlatQuestion<'a, T>>,
}

struct Walker<'a, 'v, T> {
    leaf: usize,
    mode: WalkMode,
    stack: Vec<&'a Category<T>>,
    visitor: Option<&'v mut QuestionVisitor<'v, 'a, T>>,
    leafs: Vec<LeafInfo>,
    questions: Vec<FlatQuestion<'a, T>>,
}

impl<'a, 'v, T> Walker<'a, 'v, T> {
    fn descend(&mut self, nodes: &'a [Category<T>]) {
        for cate in nodes {
            self.stack.push(cate);

            if self.stack.len() == self.leaf {
                self.visit_leaf(cate);
            } else {
                self.descend(&cate.children);
            }

            self.stack.pop();
        }
    }

    fn visit_leaf(&mut self, cate: &'a Category<T>) {
        let codes = self.codes();
        let full_path = codes.join(".");

        if self.mode.leafs {
            self.leafs.push(LeafInfo {
                path: full_path.clone(),
                basic: cate.basic.clone(),
                replace: cate.replace,
            });
        }

        if !self.mode.questions && self.visitor.is_none() {
            return;
        }

        let appendable = self.is_appendable();
        for question in &cate.questions {
            if self.mode.questions {
                self.questions.push(FlatQuestion {
                    full_path_string: full_path.clone(),
                    path: codes.clone(),
                    path_cate: self.stack.clone(),
                    question,
                    appendable,
                });
            }
            if let Some(visit) = self.visitor.as_mut() {
                visit(&self.stack, question, appendable);
            }
        }
    }

    fn codes(&self) -> Vec<String> {
        self.stack.iter().map(|c| c.basic.code.clone()).collect()
    }

    /// True if any category on the current path is appendable
    fn is_appendable(&self) -> bool {
        self.stack.iter().any(|c| c.appendable)
    }
}

impl<T> QuestionsSchema<T> {
    /// Walk the tree once, collecting what `mode` asks for and feeding every
    /// question at leaf depth to `visitor` if one is given
    pub fn walk<'a, 'v>(
        &'a self,
        mode: WalkMode,
        visitor: Option<&'v mut QuestionVisitor<'v, 'a, T>>,
    ) -> WalkOutput<'a, T> {
        let mut walker = Walker {
            leaf: self.leaf,
            mode,
            stack: Vec::with_capacity(self.leaf),
            visitor,
            leafs: Vec::new(),
            questions: Vec::new(),
        };
        walker.descend(&self.contents);

        WalkOutput {
            leafs: walker.leafs,
            questions: walker.questions,
        }
    }

    /// Summaries of every leaf category, in tree order
    pub fn leafs(&self) -> Vec<LeafInfo> {
        self.walk(WalkMode::LEAFS, None).leafs
    }

    /// Every question at leaf depth with its path and appendable flag
    pub fn flat_questions(&self) -> Vec<FlatQuestion<'_, T>> {
        self.walk(WalkMode::QUESTIONS, None).questions
    }

    /// Call `visit(path, question, appendable)` for every question
    pub fn walk_questions<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&[&'a Category<T>], &'a T, bool),
    {
        self.walk(WalkMode::VISIT, Some(&mut visit));
    }
}
