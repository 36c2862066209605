//! Campus backend services.

mod resource;

pub use resource::ResourceClient;

/// A backend service and its path under the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Student enrollments.
    Enrollments,
    /// Users of the current institution.
    Users,
    /// Cross-institution user administration.
    UserAdmin,
    /// User to institution assignments.
    UserInstitution,
    /// Password reset.
    PasswordReset,
}

impl Service {
    /// Every service, in a stable order.
    pub const ALL: [Self; 5] = [
        Self::Enrollments,
        Self::Users,
        Self::UserAdmin,
        Self::UserInstitution,
        Self::PasswordReset,
    ];

    /// The service path, appended to the gateway origin.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Enrollments => "/api/v1/enrollments",
            Self::Users => "/api/v1/users",
            Self::UserAdmin => "/api/v1/user-admin",
            Self::UserInstitution => "/api/v1/user-institution",
            Self::PasswordReset => "/api/v1/reset",
        }
    }

    /// Whether calls carry the user and institution context headers.
    #[must_use]
    pub const fn institution_scoped(self) -> bool {
        matches!(self, Self::Enrollments | Self::Users | Self::UserInstitution)
    }
}
