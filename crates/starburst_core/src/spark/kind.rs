//! Spark kinds.

/// What a spark is, which decides its update rule and its eviction priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SparkKind {
    /// Rising shell trail that explodes when its timer runs out.
    Rocket,
    /// Short-lived trail particle shed by rockets and sparks.
    Ember,
    /// Reserved for multi-stage shells.
    Shell,
    /// Explosion fragment.
    Spark,
    /// Reserved for crackling shells.
    PopShell,
    /// Reserved for crackling fragments.
    PopSpark,
}

impl SparkKind {
    /// Important kinds are never preempted by a spawn while alive.
    #[inline]
    #[must_use]
    pub const fn is_important(self) -> bool {
        matches!(self, Self::Rocket | Self::Shell | Self::PopShell)
    }
}
