mod test_relay_servers;
