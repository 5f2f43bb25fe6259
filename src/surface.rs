use crate::login::LoginForm;
use crate::rows::Row;

// The rendering side of the panel. Implementations draw a row table and a
// login modal however they like; the core only pushes state at them.
// `set_rows` replaces the whole table; the reconciler re-applies the
// selection by id after every replacement, and `select_row` with an id that
// is not in the table is a silent no-op.
pub trait DisplaySurface {
    fn set_rows(&mut self, rows: Vec<Row>);
    fn select_row(&mut self, record_id: &str);
    fn alert(&mut self, message: &str);
    fn open_login(&mut self, form: &LoginForm);
    fn close_login(&mut self);
}
