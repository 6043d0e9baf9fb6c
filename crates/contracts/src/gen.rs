use ethers::contract::abigen;

abigen!(
    EntryPointAPI,
    r#"[
        function getNonce(address sender, uint192 key) external view returns (uint256 nonce)
    ]"#
);

abigen!(
    SafeProxyFactoryAPI,
    r#"[
        function createProxyWithNonce(address singleton, bytes memory initializer, uint256 saltNonce) external returns (address proxy)
        function proxyCreationCode() external pure returns (bytes memory)
    ]"#
);

abigen!(
    SafeAPI,
    r#"[
        function setup(address[] calldata owners, uint256 threshold, address to, bytes calldata data, address fallbackHandler, address paymentToken, uint256 payment, address paymentReceiver) external
    ]"#
);

abigen!(
    SafeModuleAPI,
    r#"[
        function executeUserOp(address to, uint256 value, bytes calldata data, uint8 operation) external
    ]"#
);

abigen!(
    AddModulesAPI,
    r#"[
        function enableModules(address[] calldata modules) external
    ]"#
);

abigen!(
    MultiSendAPI,
    r#"[
        function multiSend(bytes memory transactions) external payable
    ]"#
);

abigen!(
    TokenAPI,
    r#"[
        function decimals() external view returns (uint8)
        function balanceOf(address account) external view returns (uint256)
        function transfer(address to, uint256 amount) external returns (bool)
        function approve(address spender, uint256 amount) external returns (bool)
        function mint(address to, uint256 amount) external
    ]"#
);

abigen!(
    NftAPI,
    r#"[
        function safeMint(address to) external
    ]"#
);
