mod timer_test;
