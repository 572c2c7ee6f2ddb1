mod eval_tests;
