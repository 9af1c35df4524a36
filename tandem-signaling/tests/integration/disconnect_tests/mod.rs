mod test_disconnect_cleanup;
mod test_disconnect_finality;
mod test_store_errors;
