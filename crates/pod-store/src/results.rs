/// Outcome of one mutation against one resource or subject.
///
/// Mutations resolve to one entry per affected row; a delete whose target
/// resource never existed reports `status: 404` with `success: true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub success: bool,
    /// Resource URL the statement was applied to
    pub source: String,
    /// Subject IRI of the affected row, when one is known
    pub subject: Option<String>,
    /// HTTP status of the final transport round
    pub status: Option<u16>,
}
