use core::fmt;

/// Precondition failures reported by [`Aligner::prepare`](crate::Aligner::prepare).
///
/// These are fatal for the current preparation attempt: the driver stays
/// unusable until a later `prepare` call succeeds. Everything that happens
/// inside the alignment loop itself (zero constraints, error increase) is a
/// convergence signal, not an error, and never surfaces here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    /// A supplied image has zero pixels.
    EmptyImage { role: &'static str },
    /// A pre-built target pyramid has no levels.
    EmptyPyramid,
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignError::EmptyImage { role } => {
                write!(f, "{role} image has zero pixels")
            }
            AlignError::EmptyPyramid => write!(f, "pre-built target pyramid has no levels"),
        }
    }
}

impl std::error::Error for AlignError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = AlignError::EmptyImage { role: "template" };
        assert_eq!(err.to_string(), "template image has zero pixels");
        assert_eq!(
            AlignError::EmptyPyramid.to_string(),
            "pre-built target pyramid has no levels"
        );
    }
}
