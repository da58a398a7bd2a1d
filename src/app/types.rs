#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Products,
    Cart,
}
