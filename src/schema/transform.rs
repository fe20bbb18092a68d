//! Structure-preserving schema conversion
//!
//! [`transform`] rebuilds a schema with a different question type. Every
//! category keeps its name, code and flags; only leaf questions pass through
//! the caller's mapping function.

use super::tree::{Category, QuestionsSchema};

struct CopyCtx<'a, T> {
    leaf: usize,
    stack: Vec<&'a Category<T>>,
}

/// Map every leaf question of `src` through `f`, keeping the tree shape
///
/// `f` receives the source path (root to leaf), the question, the
/// destination parent of the leaf (`None` at depth 1) and the appendable
/// flag of the leaf's parent category. Unlike [`QuestionsSchema::walk`]
/// the flag is not OR-ed over the whole path.
///
/// The first error from `f` stops the conversion and is returned as is.
pub fn transform<'a, T, V, E, F>(src: &'a QuestionsSchema<T>, mut f: F) -> Result<QuestionsSchema<V>, E>
where
    F: FnMut(&[&'a Category<T>], &'a T, Option<&Category<V>>, bool) -> Result<V, E>,
{
    let mut ctx = CopyCtx {
        leaf: src.leaf,
        stack: Vec::with_capacity(src.leaf),
    };

    let mut contents = Vec::with_capacity(src.contents.len());
    for cate in &src.contents {
        contents.push(copy_category(&mut ctx, cate, None, &mut f)?);
    }

    Ok(QuestionsSchema {
        leaf: src.leaf,
        max_question_id: src.max_question_id,
        contents,
    })
}

fn copy_category<'a, T, V, E, F>(
    ctx: &mut CopyCtx<'a, T>,
    src: &'a Category<T>,
    dest_parent: Option<&Category<V>>,
    f: &mut F,
) -> Result<Category<V>, E>
where
    F: FnMut(&[&'a Category<T>], &'a T, Option<&Category<V>>, bool) -> Result<V, E>,
{
    let mut dest = Category {
        basic: src.basic.clone(),
        children: Vec::new(),
        questions: Vec::new(),
        appendable: src.appendable,
        replace: src.replace,
    };

    ctx.stack.push(src);

    if ctx.stack.len() == ctx.leaf {
        let appendable = parent_appendable(&ctx.stack);
        dest.questions.reserve(src.questions.len());
        for question in &src.questions {
            let converted = f(&ctx.stack, question, dest_parent, appendable)?;
            dest.questions.push(converted);
        }
    } else {
        dest.children.reserve(src.children.len());
        for child in &src.children {
            let copied = copy_category(ctx, child, Some(&dest), f)?;
            dest.children.push(copied);
        }
    }

    ctx.stack.pop();
    Ok(dest)
}

/// Appendable flag of the entry just below the top of the stack
fn parent_appendable<T>(stack: &[&Category<T>]) -> bool {
    stack
        .len()
        .checked_sub(2)
        .map(|idx| stack[idx].appendable)
        .unwrap_or(false)
}
