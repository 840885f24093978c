//! DTOs for classes_sea adapter.

#[derive(Debug, Clone)]
pub struct ClassCreate {
    pub name: String,
    pub school_year: String,
}

/// Fields left `None` are not touched.
#[derive(Debug, Clone, Default)]
pub struct ClassUpdate {
    pub name: Option<String>,
    pub school_year: Option<String>,
}
