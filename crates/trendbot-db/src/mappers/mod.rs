//! Model to entity mappers

mod installation;
