mod root;

pub use root::find_project_root;
