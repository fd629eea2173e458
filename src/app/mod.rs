pub mod movie_store;
pub mod routes;
