use super::PsmGroup;

/// Assigns ranks (and whatever else a scoring step derives) to the matches of a
/// spectrum before the group is accepted.
///
/// Scoring formulas belong to the host; implement this trait to plug one in.
pub trait MatchRanker {
    /// Rank the matches of one spectrum in place
    fn rank(&self, group: &mut PsmGroup);
}

/// Gives every match rank 1, leaving the order untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRanker;

impl MatchRanker for UniformRanker {
    fn rank(&self, group: &mut PsmGroup) {
        for m in &mut group.matches {
            m.rank = 1;
        }
    }
}

impl<F> MatchRanker for F
where
    F: Fn(&mut PsmGroup),
{
    fn rank(&self, group: &mut PsmGroup) {
        self(group)
    }
}
