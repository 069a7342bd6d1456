mod assets;
mod traversal;
