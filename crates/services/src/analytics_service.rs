use study_core::analytics::{self, Overview, RecentWrong, SubjectStats, WeakPoint, YearStats};
use study_core::model::PassRateTable;

use crate::context::StudyContext;

/// All analytics sections computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub overview: Overview,
    pub subjects: Vec<SubjectStats>,
    pub years: Vec<YearStats>,
    pub weak_points: Vec<WeakPoint>,
    pub recent_wrong: Vec<RecentWrong>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsService;

impl AnalyticsService {
    #[must_use]
    pub fn overview(ctx: &StudyContext) -> Overview {
        analytics::overview(ctx.content(), ctx.progress())
    }

    #[must_use]
    pub fn dashboard(ctx: &StudyContext) -> Dashboard {
        let questions = &ctx.content().questions;
        let progress = ctx.progress();
        Dashboard {
            overview: analytics::overview(ctx.content(), progress),
            subjects: analytics::subject_stats(questions, progress),
            years: analytics::year_stats(questions, progress),
            weak_points: analytics::weak_points(questions, progress),
            recent_wrong: analytics::recent_wrong(questions, progress),
        }
    }

    /// Pass-rate table for `kind`, `None` when there is no data.
    #[must_use]
    pub fn pass_rates<'a>(ctx: &'a StudyContext, kind: &str) -> Option<&'a PassRateTable> {
        ctx.content().pass_rate(kind)
    }
}
