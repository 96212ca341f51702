/// Customer details as typed into the form, captured right before rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerRecord {
    pub name: String,
    pub address: String,
    pub contact: String,
    pub email: String,
}
