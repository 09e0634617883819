pub async fn get_index_route() -> &'static str {
    "Student Management API"
}
